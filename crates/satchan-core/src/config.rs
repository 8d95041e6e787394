//! # Configuration System
//!
//! YAML configuration for satchan runs:
//!
//! - Link parameters (frequency, environment, atmosphere, geometry)
//! - Receiver chain (EIRP, antenna gain, LNA temperature)
//! - Timeline settings (step size, calibration use)
//! - Calibration solver settings
//! - Logging
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `SATCHAN_CONFIG` environment variable
//! 2. `./satchan.yaml` (current directory)
//! 3. `~/.config/satchan/config.yaml` (user config)
//! 4. `/etc/satchan/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! link:
//!   frequency_ghz: 19.7
//!   environment: suburban
//!   rain_rate_mm_h: 5.0
//!
//! receiver:
//!   eirp_dbw: 55.0
//!   rx_antenna_gain_dbi: 42.0
//!
//! timeline:
//!   step_s: 5.0
//!   use_calibration: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calibration::CalibrationSettings;
use crate::error::ConfigError;
use crate::observe::LogConfig;
use crate::params::LinkParams;
use crate::receiver::ReceiverConfig;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SATCHAN_CONFIG";

/// Time-series generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Spacing between frames (s)
    pub step_s: f64,
    /// Apply the stored calibration profile to every frame
    pub use_calibration: bool,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            step_s: 10.0,
            use_calibration: false,
        }
    }
}

/// Complete satchan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatchanConfig {
    /// Configuration version
    pub version: String,
    pub link: LinkParams,
    pub receiver: ReceiverConfig,
    pub timeline: TimelineSettings,
    pub calibration: CalibrationSettings,
    pub logging: LogConfig,
}

impl Default for SatchanConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            link: LinkParams::default(),
            receiver: ReceiverConfig::default(),
            timeline: TimelineSettings::default(),
            calibration: CalibrationSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl SatchanConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns default config if no file is found. A `SATCHAN_CONFIG` that
    /// names a missing file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config = Self::parse(&content)?;
        config.validate()?;
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
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Configuration search paths, most specific first.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./satchan.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "satchan") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/satchan/config.yaml"));
        paths
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.link
            .validate()
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if !(self.timeline.step_s > 0.0) || !self.timeline.step_s.is_finite() {
            return Err(ConfigError::ValidationError(
                "timeline.step_s must be positive".to_string(),
            ));
        }

        if self.receiver.lna_temperature_k < 0.0 {
            return Err(ConfigError::ValidationError(
                "receiver.lna_temperature_k must be >= 0".to_string(),
            ));
        }

        if self.calibration.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "calibration.max_iterations must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
