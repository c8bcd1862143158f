//! Controller configuration

use eink_emulator::{ConfigError, EmulatorConfig};
use serde::{Deserialize, Serialize};

/// Settings for [`DisplayController`](crate::DisplayController)
///
/// ```
/// use eink_display::ControllerConfig;
///
/// let config = ControllerConfig::from_json(r#"{ "auto_init": false }"#).unwrap();
/// assert!(!config.auto_init);
/// assert_eq!(config.emulator.lighten_ladder, vec![180, 220, 255]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Initialize a physical panel when the controller is opened
    pub auto_init: bool,
    /// Ghost model used when no panel is attached
    pub emulator: EmulatorConfig,
}

impl ControllerConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.emulator.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            auto_init: true,
            emulator: EmulatorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use eink_emulator::Pacing;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert!(config.auto_init);
        assert_eq!(config.emulator, EmulatorConfig::default());
        assert_eq!(ControllerConfig::from_json("{}").unwrap(), config);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = ControllerConfig::default();
        config.emulator.pacing = Pacing::Realtime;
        let json = config.to_json().unwrap();
        assert_eq!(ControllerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_ladder_rejected() {
        let json = r#"{ "emulator": { "lighten_ladder": [] } }"#;
        assert!(matches!(
            ControllerConfig::from_json(json),
            Err(ConfigError::EmptyLadder(_))
        ));
    }
}
