//! Operator configuration persisted on the device

use serde::{Deserialize, Serialize};

/// Default long-press threshold in milliseconds
pub const DEFAULT_LONG_PRESS_THRESHOLD_MS: u16 = 1000;

/// Foot switch configuration, stored by the persistence adapter and edited
/// through the web adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// When set, a high pin level means "pressed"
    pub switch_polarity_inverted: bool,
    /// Presses held at least this long are classified as long presses
    pub long_press_threshold_ms: u16,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            switch_polarity_inverted: false,
            long_press_threshold_ms: DEFAULT_LONG_PRESS_THRESHOLD_MS,
        }
    }
}

impl DeviceConfig {
    pub fn new(switch_polarity_inverted: bool, long_press_threshold_ms: u16) -> Self {
        Self {
            switch_polarity_inverted,
            long_press_threshold_ms,
        }
    }

    /// Map a raw pin level to "pressed", honouring the polarity flag.
    ///
    /// The switch input is pulled up, so with normal polarity a low level
    /// means pressed.
    pub fn is_pressed(&self, pin_high: bool) -> bool {
        pin_high == self.switch_polarity_inverted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeviceConfig::default();
        assert!(!config.switch_polarity_inverted);
        assert_eq!(config.long_press_threshold_ms, 1000);
    }

    #[test]
    fn test_polarity() {
        let normal = DeviceConfig::default();
        assert!(normal.is_pressed(false));
        assert!(!normal.is_pressed(true));

        let inverted = DeviceConfig::new(true, 1000);
        assert!(inverted.is_pressed(true));
        assert!(!inverted.is_pressed(false));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DeviceConfig =
            serde_json::from_str(r#"{"switch_polarity_inverted":true}"#).unwrap();
        assert!(config.switch_polarity_inverted);
        assert_eq!(config.long_press_threshold_ms, DEFAULT_LONG_PRESS_THRESHOLD_MS);
    }
}
