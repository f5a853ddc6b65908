//! Logging configuration
//!
//! Consumed by the binary's subscriber setup. Log files are named by start
//! time and rotated by count.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    /// Write logs to stderr
    pub console_output: bool,
    /// Write logs to a file in `log_directory`
    pub file_output: bool,
    pub log_directory: PathBuf,
    /// Number of log files kept
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            max_files: 10,
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO
    pub fn parse_level(&self) -> Level {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    pub fn ensure_log_directory(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.log_directory)
    }

    /// Path of the log file for this run
    pub fn current_log_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        self.log_directory.join(format!("footlight_{}.log", stamp))
    }

    /// Delete the oldest `*.log` files so at most `max_files` remain.
    ///
    /// Returns the number of files removed.
    pub fn cleanup_old_logs(&self) -> io::Result<usize> {
        if !self.log_directory.exists() {
            return Ok(0);
        }

        let mut logs: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&self.log_directory)? {
            let entry = entry?;
            let path = entry.path();
            if !is_log_file(&path) {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            logs.push((modified, path));
        }

        if logs.len() <= self.max_files {
            return Ok(0);
        }

        // newest first
        logs.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        let mut removed = 0;
        for (_, path) in logs.into_iter().skip(self.max_files) {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }
}

fn is_log_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.parse_level(), Level::INFO);
        config.level = "DEBUG".to_string();
        assert_eq!(config.parse_level(), Level::DEBUG);
        config.level = "nonsense".to_string();
        assert_eq!(config.parse_level(), Level::INFO);
    }

    #[test]
    fn test_cleanup_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_directory: dir.path().to_path_buf(),
            max_files: 2,
            ..Default::default()
        };

        for name in ["a.log", "b.log", "c.log", "notes.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }

        assert_eq!(config.cleanup_old_logs().unwrap(), 1);
        let remaining = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 3);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_log_path_in_directory() {
        let config = LogConfig::default();
        let path = config.current_log_path();
        assert!(path.starts_with("logs"));
        assert_eq!(path.extension().unwrap(), "log");
    }
}
