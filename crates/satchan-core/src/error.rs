//! Error types
//!
//! The propagation models themselves are total and never fail; errors only
//! arise at the edges of the crate (configuration files, calibration input
//! files, explicit parameter validation).

use thiserror::Error;

/// Result type for fallible satchan operations
pub type SatchanResult<T> = Result<T, SatchanError>;

/// Top-level error type
#[derive(Debug, Clone, Error)]
pub enum SatchanError {
    /// A link parameter is outside its physical domain
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

/// Error type for configuration operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("config not found: {0}")]
    NotFound(String),
    /// Failed to read configuration file
    #[error("failed to read config: {0}")]
    ReadError(String),
    /// Failed to parse configuration
    #[error("failed to parse config: {0}")]
    ParseError(String),
    /// Invalid configuration value
    #[error("invalid config: {0}")]
    ValidationError(String),
}

/// Errors raised while reading calibration input.
#[derive(Debug, Clone, Error)]
pub enum CalibrationError {
    #[error("failed to parse calibration input: {0}")]
    Parse(String),

    /// A custom reference satellite leaves the fit underdetermined
    #[error("custom reference satellite is missing required fields: {}", missing.join(", "))]
    IncompleteSatellite { missing: Vec<&'static str> },
}
