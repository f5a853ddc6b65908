//! Device configuration and presets on a key/value store
//!
//! Layout:
//! - namespace `configuration`: `SwitchPolarityInv` (u8), `LongPressThreshold` (u16)
//! - namespace `presets`: `NumberOfPresets` (u8), `Preset{index}` (JSON blob)

use footlight_core::{CoreError, DeviceConfig, Preset, MAX_PRESETS, MIN_PRESETS};
use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, StoredValue};
use crate::Result;

pub const CONFIGURATION_NAMESPACE: &str = "configuration";
pub const PRESETS_NAMESPACE: &str = "presets";

pub const KEY_SWITCH_POLARITY_INV: &str = "SwitchPolarityInv";
pub const KEY_LONG_PRESS_THRESHOLD: &str = "LongPressThreshold";
pub const KEY_NUMBER_OF_PRESETS: &str = "NumberOfPresets";

/// Key of the blob holding preset `index`
pub fn preset_key(index: u8) -> String {
    format!("Preset{}", index)
}

/// Stored form of one preset. Universes keep their logical length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetRecord {
    pub index: u8,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub universe1: Vec<u8>,
    #[serde(default)]
    pub universe2: Vec<u8>,
}

impl From<&Preset> for PresetRecord {
    fn from(preset: &Preset) -> Self {
        Self {
            index: preset.index(),
            name: preset.name().to_string(),
            universe1: preset.universe(0).map(|u| u.as_slice().to_vec()).unwrap_or_default(),
            universe2: preset.universe(1).map(|u| u.as_slice().to_vec()).unwrap_or_default(),
        }
    }
}

impl From<PresetRecord> for Preset {
    fn from(record: PresetRecord) -> Self {
        Preset::with_data(record.index, &record.name, &record.universe1, &record.universe2)
    }
}

pub struct NvsStorage<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> NvsStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_config(&mut self, config: &DeviceConfig) -> Result<()> {
        self.store.set(
            CONFIGURATION_NAMESPACE,
            KEY_SWITCH_POLARITY_INV,
            StoredValue::U8(u8::from(config.switch_polarity_inverted)),
        )?;
        self.store.set(
            CONFIGURATION_NAMESPACE,
            KEY_LONG_PRESS_THRESHOLD,
            StoredValue::U16(config.long_press_threshold_ms),
        )?;
        self.store.commit(CONFIGURATION_NAMESPACE)?;

        tracing::info!(
            "Stored configuration: polarity inverted={}, long press={} ms",
            config.switch_polarity_inverted,
            config.long_press_threshold_ms
        );
        Ok(())
    }

    pub fn load_config(&self) -> Result<DeviceConfig> {
        let inverted = self.get_u8(CONFIGURATION_NAMESPACE, KEY_SWITCH_POLARITY_INV)?;
        let threshold = self.get_u16(CONFIGURATION_NAMESPACE, KEY_LONG_PRESS_THRESHOLD)?;
        Ok(DeviceConfig::new(inverted != 0, threshold))
    }

    /// Store the active presets in order.
    ///
    /// Blobs left over from a larger bank are erased.
    pub fn store_presets(&mut self, presets: &[Preset]) -> Result<()> {
        let count = u8::try_from(presets.len())
            .ok()
            .filter(|n| (MIN_PRESETS..=MAX_PRESETS).contains(n))
            .ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "cannot store {} presets (must be {}-{})",
                    presets.len(),
                    MIN_PRESETS,
                    MAX_PRESETS
                ))
            })?;

        self.store.set(
            PRESETS_NAMESPACE,
            KEY_NUMBER_OF_PRESETS,
            StoredValue::U8(count),
        )?;
        for (slot, preset) in (0..count).zip(presets) {
            let mut record = PresetRecord::from(preset);
            record.index = slot;
            let blob = serde_json::to_vec(&record)?;
            self.store
                .set(PRESETS_NAMESPACE, &preset_key(slot), StoredValue::Blob(blob))?;
        }
        for stale in count..MAX_PRESETS {
            self.store.erase(PRESETS_NAMESPACE, &preset_key(stale))?;
        }
        self.store.commit(PRESETS_NAMESPACE)?;

        tracing::info!("Stored {} presets", count);
        Ok(())
    }

    pub fn load_presets(&self) -> Result<Vec<Preset>> {
        let count = self.get_u8(PRESETS_NAMESPACE, KEY_NUMBER_OF_PRESETS)?;
        if !(MIN_PRESETS..=MAX_PRESETS).contains(&count) {
            return Err(CoreError::persistence(format!(
                "stored number of presets {} is invalid",
                count
            ))
            .into());
        }

        (0..count)
            .map(|index| -> Result<Preset> {
                let key = preset_key(index);
                match self.store.get(PRESETS_NAMESPACE, &key)? {
                    Some(StoredValue::Blob(blob)) => {
                        let record: PresetRecord = serde_json::from_slice(&blob)?;
                        Ok(Preset::from(record))
                    }
                    other => Err(missing(PRESETS_NAMESPACE, &key, other).into()),
                }
            })
            .collect()
    }

    fn get_u8(&self, namespace: &str, key: &str) -> Result<u8> {
        match self.store.get(namespace, key)? {
            Some(StoredValue::U8(value)) => Ok(value),
            other => Err(missing(namespace, key, other).into()),
        }
    }

    fn get_u16(&self, namespace: &str, key: &str) -> Result<u16> {
        match self.store.get(namespace, key)? {
            Some(StoredValue::U16(value)) => Ok(value),
            other => Err(missing(namespace, key, other).into()),
        }
    }
}

fn missing(namespace: &str, key: &str, found: Option<StoredValue>) -> CoreError {
    let err = match found {
        None => CoreError::persistence(format!("{}/{} not found", namespace, key)),
        Some(_) => CoreError::persistence(format!("{}/{} has the wrong type", namespace, key)),
    };
    tracing::error!("Failed to load {}/{}: {}", namespace, key, err);
    err
}
