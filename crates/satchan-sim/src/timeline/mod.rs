//! Channel time series over an orbital pass
//!
//! Drives the link budget and CIR engines across a sequence of geometries
//! from an [`OrbitPropagator`](crate::orbit::OrbitPropagator) and attaches
//! absolute received power, noise floor, SNR and capacity to each frame.

pub mod engine;
pub mod frame;

pub use engine::{TimelineGenerator, MIN_MODEL_ELEVATION_DEG};
pub use frame::{tap_table, FrameTapRow, TimelineFrame, TimelineRow};
pub use satchan_core::config::TimelineSettings;
