//! # Satellite Channel Time Series
//!
//! Drives the `satchan-core` models along a satellite pass. An
//! [`OrbitPropagator`] supplies look angles per timestamp; the
//! [`TimelineGenerator`] turns each into a [`TimelineFrame`] holding the
//! link budget, received levels, MIMO capacity and impulse response.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use satchan_core::{GroundStation, LinkParams, ReceiverConfig, TimelineSettings};
//! use satchan_sim::{OrbitalElements, TimelineGenerator};
//!
//! let epoch = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let generator = TimelineGenerator::new(
//!     LinkParams::default(),
//!     ReceiverConfig::default(),
//!     TimelineSettings::default(),
//! );
//! let frames = generator.generate_from_elements(
//!     OrbitalElements::geostationary(10.0),
//!     GroundStation::new(45.0, 10.0, 0.0),
//!     epoch,
//!     epoch,
//!     epoch + Duration::minutes(1),
//! );
//! assert_eq!(frames.len(), 7);
//! assert!(!frames[0].below_horizon);
//! ```

pub mod error;
pub mod orbit;
pub mod timeline;

pub use error::{OrbitError, OrbitResult};
pub use orbit::{
    KeplerianPropagator, LookAngles, OrbitPropagator, OrbitalElements, PassScanner, PassWindow,
};
pub use timeline::{tap_table, FrameTapRow, TimelineFrame, TimelineGenerator, TimelineRow};
