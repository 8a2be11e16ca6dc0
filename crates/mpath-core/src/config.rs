//! # Configuration System
//!
//! YAML configuration for applications built on the engine:
//!
//! - The starting scene (geometry, carrier, motion, walls)
//! - Waveform generator settings
//! - Motion scenario timing
//! - Logging
//! - Named scene presets
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `MPATH_CONFIG` environment variable
//! 2. `./mpath.yaml` (current directory)
//! 3. `~/.config/mpath/config.yaml` (user config)
//! 4. `/etc/mpath/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! scene:
//!   wall_distance_m: 20.0
//!   receiver_distance_m: 10.0
//!   carrier_frequency_mhz: 900.0
//!   velocity_mps: 15.0
//!   direction: approaching
//!   left_wall_active: true
//!   right_wall_active: true
//!
//! scenario:
//!   duration_s: 2.0
//!   step_s: 0.25
//!
//! logging:
//!   level: debug
//!   format: pretty
//! ```

use crate::logging::LogConfig;
use crate::params::SceneParameters;
use crate::types::Direction;
use crate::waveform::{WaveformConfig, MIN_STEP_RAD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MPATH_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),
    #[error("failed to read config: {0}")]
    ReadError(String),
    #[error("failed to write config: {0}")]
    WriteError(String),
    #[error("failed to parse config: {0}")]
    ParseError(String),
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Motion scenario timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioTiming {
    /// Total simulated time in seconds
    pub duration_s: f64,
    /// Time between snapshots in seconds
    pub step_s: f64,
}

impl Default for ScenarioTiming {
    fn default() -> Self {
        Self {
            duration_s: 1.0,
            step_s: 0.1,
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpathConfig {
    /// Configuration version
    pub version: String,
    /// Starting scene
    pub scene: SceneParameters,
    /// Waveform generator settings
    pub waveform: WaveformConfig,
    /// Motion scenario timing
    pub scenario: ScenarioTiming,
    /// Logging configuration
    pub logging: LogConfig,
    /// Named scenes (name -> scene)
    pub presets: BTreeMap<String, SceneParameters>,
}

impl Default for MpathConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            scene: SceneParameters::default(),
            waveform: WaveformConfig::default(),
            scenario: ScenarioTiming::default(),
            logging: LogConfig::default(),
            presets: BTreeMap::new(),
        }
    }
}

impl MpathConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Self::load_from(&path);
            }
            tracing::warn!(path = %path.display(), "{} points at a missing file", CONFIG_ENV_VAR);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::WriteError(format!("{}: {}", path.display(), e)))
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Replace the scene with a named preset.
    pub fn with_preset(&self, name: &str) -> Result<Self, ConfigError> {
        let scene = self
            .presets
            .get(name)
            .ok_or_else(|| ConfigError::NotFound(format!("preset '{}' not found", name)))?;

        let mut config = self.clone();
        config.scene = *scene;
        Ok(config)
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./mpath.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "mpath") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/mpath/config.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("scene: {}", e)))?;

        for (name, preset) in &self.presets {
            preset
                .validate()
                .map_err(|e| ConfigError::ValidationError(format!("preset '{}': {}", name, e)))?;
        }

        if !self.waveform.has_valid_step() {
            return Err(ConfigError::ValidationError(format!(
                "waveform.step_rad must be between {} and 2π, got {}",
                MIN_STEP_RAD, self.waveform.step_rad
            )));
        }

        let timing = self.scenario;
        let positive = |x: f64| x > 0.0 && x.is_finite();
        if !positive(timing.step_s) || !positive(timing.duration_s) {
            return Err(ConfigError::ValidationError(
                "scenario.duration_s and scenario.step_s must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let mut presets = BTreeMap::new();
        presets.insert(
            "left_wall_only".to_string(),
            SceneParameters::builder().walls(true, false).build(),
        );
        presets.insert(
            "walking_towards_transmitter".to_string(),
            SceneParameters::builder()
                .velocity(1.5, Direction::Approaching)
                .build(),
        );
        presets.insert(
            "vehicle_receding".to_string(),
            SceneParameters::builder()
                .wall_distance(200.0)
                .receiver_distance(50.0)
                .velocity(15.0, Direction::Receding)
                .build(),
        );

        let config = Self {
            presets,
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogFormat, LogLevel};

    #[test]
    fn test_default_config_is_valid() {
        let config = MpathConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scene, SceneParameters::default());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
scene:
  velocity_mps: 15.0
  direction: approaching
  left_wall_active: false
logging:
  level: debug
  format: json
"#;
        let config = MpathConfig::parse(yaml).unwrap();
        assert_eq!(config.scene.velocity_mps, 15.0);
        assert_eq!(config.scene.direction, Direction::Approaching);
        assert!(!config.scene.left_wall_active);
        // unspecified fields keep their defaults
        assert_eq!(config.scene.wall_distance_m, 20.0);
        assert!(config.scene.right_wall_active);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.waveform, WaveformConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let result = MpathConfig::parse("scene: [1, 2");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_rejects_bad_geometry() {
        let mut config = MpathConfig::default();
        config.scene.receiver_distance_m = 25.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scene"));
    }

    #[test]
    fn test_validation_rejects_bad_preset() {
        let mut config = MpathConfig::default();
        config.presets.insert(
            "broken".to_string(),
            SceneParameters::builder().carrier_frequency_mhz(-1.0).build(),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_validation_rejects_tiny_waveform_step() {
        let config = MpathConfig::parse("waveform:\n  step_rad: 1.0e-300\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("step_rad"));
    }

    #[test]
    fn test_validation_rejects_bad_timing() {
        for (duration_s, step_s) in [(0.0, 0.1), (1.0, f64::NAN), (f64::INFINITY, 0.1)] {
            let mut config = MpathConfig::default();
            config.scenario = ScenarioTiming { duration_s, step_s };
            assert!(config.validate().is_err(), "{} / {} should be rejected", duration_s, step_s);
        }
    }

    #[test]
    fn test_example_yaml_round_trip() {
        let yaml = MpathConfig::example_yaml();
        let config = MpathConfig::parse(&yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.presets.len(), 3);

        let preset = config.with_preset("left_wall_only").unwrap();
        assert!(!preset.scene.right_wall_active);
        assert!(config.with_preset("missing").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpath.yaml");

        let mut config = MpathConfig::default();
        config.scene.carrier_frequency_mhz = 2400.0;
        config.save(&path).unwrap();

        let loaded = MpathConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MpathConfig::load_from(Path::new("/nonexistent/mpath.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_search_paths() {
        let paths = MpathConfig::config_search_paths();
        assert_eq!(paths[0], PathBuf::from("./mpath.yaml"));
        assert_eq!(paths.last(), Some(&PathBuf::from("/etc/mpath/config.yaml")));
    }
}
