//! Host deployment settings, read from a TOML file

use anyhow::{Context, Result};
use footlight_control::dmx::ARTNET_QUEUE_CAPACITY;
use footlight_control::display::DISPLAY_QUEUE_CAPACITY;
use footlight_control::osc::OSC_QUEUE_CAPACITY;
use footlight_control::storage::PERSISTENCE_QUEUE_CAPACITY;
use footlight_control::WebServerConfig;
use footlight_core::footswitch::EDGE_QUEUE_CAPACITY;
use footlight_core::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "FOOTLIGHT_CONFIG";

/// Mailbox capacities per actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub selector: usize,
    pub artnet: usize,
    pub osc: usize,
    pub display: usize,
    pub persistence: usize,
    pub edges: usize,
    pub controller: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            selector: 10,
            artnet: ARTNET_QUEUE_CAPACITY,
            osc: OSC_QUEUE_CAPACITY,
            display: DISPLAY_QUEUE_CAPACITY,
            persistence: PERSISTENCE_QUEUE_CAPACITY,
            edges: EDGE_QUEUE_CAPACITY,
            controller: 4,
        }
    }
}

/// Everything the binary needs to wire up the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Art-Net destination, normally the broadcast address
    pub artnet_target: String,
    pub osc_target: String,
    /// Prepended to every OSC address
    pub osc_prefix: String,
    /// Directory holding the persisted namespaces
    pub storage_directory: PathBuf,
    /// Read foot switch commands from stdin
    pub simulator: bool,
    pub web: WebServerConfig,
    pub queues: QueueSettings,
    pub logging: LogConfig,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            artnet_target: "255.255.255.255:6454".to_string(),
            osc_target: "127.0.0.1:8000".to_string(),
            osc_prefix: "/footlight".to_string(),
            storage_directory: PathBuf::from("storage"),
            simulator: true,
            web: WebServerConfig::default(),
            queues: QueueSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl ControllerSettings {
    /// Load settings from a TOML file; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Invalid settings file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the settings path: first CLI argument, then `FOOTLIGHT_CONFIG`.
    pub fn resolve_path(cli_arg: Option<String>) -> Option<PathBuf> {
        cli_arg
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .map(PathBuf::from)
    }

    /// Load from the resolved path, or defaults when none is given
    pub fn from_args() -> Result<Self> {
        match Self::resolve_path(std::env::args().nth(1)) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = ControllerSettings::from_toml("").unwrap();
        assert_eq!(settings.artnet_target, "255.255.255.255:6454");
        assert_eq!(settings.osc_prefix, "/footlight");
        assert_eq!(settings.queues, QueueSettings::default());
        assert_eq!(settings.web.port, 8080);
    }

    #[test]
    fn test_partial_file_overrides() {
        let settings = ControllerSettings::from_toml(
            r#"
            osc_target = "10.0.0.5:9000"
            simulator = false

            [web]
            port = 9090

            [queues]
            artnet = 40

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(settings.osc_target, "10.0.0.5:9000");
        assert!(!settings.simulator);
        assert_eq!(settings.web.port, 9090);
        assert_eq!(settings.web.host, "127.0.0.1");
        assert_eq!(settings.queues.artnet, 40);
        assert_eq!(settings.queues.osc, OSC_QUEUE_CAPACITY);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ControllerSettings::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.osc_target, "127.0.0.1:8000");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footlight.toml");
        std::fs::write(&path, "queues = 3").unwrap();
        assert!(ControllerSettings::load(&path).is_err());
    }

    #[test]
    fn test_cli_argument_wins() {
        let path = ControllerSettings::resolve_path(Some("custom.toml".to_string()));
        assert_eq!(path, Some(PathBuf::from("custom.toml")));
    }
}
