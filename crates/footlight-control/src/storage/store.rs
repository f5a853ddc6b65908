//! Namespaced key/value stores
//!
//! Writes are staged in memory and become durable on `commit`, the way a
//! flash key/value partition behaves.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{error::ControlError, Result};

/// Maximum size of one namespace file (4 MB)
pub const MAX_NAMESPACE_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// A typed value slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum StoredValue {
    U8(u8),
    U16(u16),
    Blob(Vec<u8>),
}

type Namespace = BTreeMap<String, StoredValue>;

/// Backend of the persistence adapter
pub trait KeyValueStore: Send + 'static {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<StoredValue>>;

    fn set(&mut self, namespace: &str, key: &str, value: StoredValue) -> Result<()>;

    /// Remove a key; removing a missing key is not an error
    fn erase(&mut self, namespace: &str, key: &str) -> Result<()>;

    /// Make staged writes to `namespace` durable
    fn commit(&mut self, namespace: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    namespaces: HashMap<String, Namespace>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<StoredValue>> {
        Ok(self
            .namespaces
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&mut self, namespace: &str, key: &str, value: StoredValue) -> Result<()> {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn erase(&mut self, namespace: &str, key: &str) -> Result<()> {
        if let Some(ns) = self.namespaces.get_mut(namespace) {
            ns.remove(key);
        }
        Ok(())
    }

    fn commit(&mut self, _namespace: &str) -> Result<()> {
        Ok(())
    }
}

/// Store keeping one JSON file per namespace in a directory
#[derive(Debug)]
pub struct FileStore {
    directory: PathBuf,
    namespaces: HashMap<String, Namespace>,
}

impl FileStore {
    /// Open (and create if needed) a store directory, loading every
    /// committed namespace.
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;

        let mut namespaces = HashMap::new();
        for entry in std::fs::read_dir(&directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            namespaces.insert(name.to_string(), load_namespace(&path)?);
        }

        tracing::info!(
            "Opened store {:?} with {} namespaces",
            directory,
            namespaces.len()
        );
        Ok(Self {
            directory,
            namespaces,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.directory.join(format!("{}.json", namespace))
    }
}

fn load_namespace(path: &Path) -> Result<Namespace> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_NAMESPACE_FILE_SIZE {
        return Err(ControlError::InvalidParameter(format!(
            "Store file {:?} is {} bytes (limit {})",
            path, size, MAX_NAMESPACE_FILE_SIZE
        )));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

impl KeyValueStore for FileStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<StoredValue>> {
        Ok(self
            .namespaces
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&mut self, namespace: &str, key: &str, value: StoredValue) -> Result<()> {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn erase(&mut self, namespace: &str, key: &str) -> Result<()> {
        if let Some(ns) = self.namespaces.get_mut(namespace) {
            ns.remove(key);
        }
        Ok(())
    }

    fn commit(&mut self, namespace: &str) -> Result<()> {
        let empty = Namespace::new();
        let contents = self.namespaces.get(namespace).unwrap_or(&empty);

        let path = self.namespace_path(namespace);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, contents)?;

        tracing::debug!("Committed namespace {} to {:?}", namespace, path);
        Ok(())
    }
}
