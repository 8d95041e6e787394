//! # Calibration Engine
//!
//! Fits five bias corrections to field measurements so that the link budget
//! reproduces what a real terminal observed.
//!
//! | Parameter              | Range         | Identity |
//! |------------------------|---------------|----------|
//! | rain correction factor | 0.5 .. 2.0    | 1.0      |
//! | gas offset (dB)        | −2 .. 2       | 0.0      |
//! | scatter offset (dB)    | −10 .. 10     | 0.0      |
//! | EIRP offset (dB)       | −6 .. 6       | 0.0      |
//! | Tsys offset (K)        | −100 .. 200   | 0.0      |
//!
//! ## Example
//!
//! ```rust
//! use satchan_core::calibration::{CalibrationEngine, CalibrationInput};
//! use satchan_core::params::LinkParams;
//! use satchan_core::receiver::ReceiverConfig;
//!
//! let input = CalibrationInput::from_json(
//!     r#"[{"elevation_deg": 30.0, "rssi_dbm": -82.0}]"#,
//! ).unwrap();
//! let engine = CalibrationEngine::new(LinkParams::default(), ReceiverConfig::default());
//! let profile = engine.calibrate_input(&input).unwrap();
//! assert!(profile.calibrated);
//! assert!(profile.parameters.is_within_bounds());
//! ```

pub mod engine;
pub mod measurement;
pub mod profile;
pub mod solver;

pub use engine::{calibrate, CalibrationEngine, CalibrationSettings};
pub use measurement::{
    CalibrationInput, CalibrationMetadata, CustomSatellite, MeasurementPoint, ReferenceSatellite,
};
pub use profile::{CalibrationParameter, CalibrationParameters, CalibrationProfile, ParameterRow};
