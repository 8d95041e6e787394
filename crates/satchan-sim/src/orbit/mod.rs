//! Orbit propagation contract
//!
//! The time-series generator only needs look angles per timestamp. Any
//! propagator (SGP4, ephemeris playback, the two-body model in
//! [`keplerian`]) plugs in through [`OrbitPropagator`].

pub mod keplerian;
pub mod pass;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use keplerian::{KeplerianPropagator, OrbitalElements};
pub use pass::{PassScanner, PassWindow};

/// Satellite position as seen from the ground station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookAngles {
    /// Geometric elevation, negative below the horizon (deg)
    pub elevation_deg: f64,
    /// Azimuth clockwise from north, 0..360 (deg)
    pub azimuth_deg: f64,
    pub slant_range_km: f64,
}

impl LookAngles {
    pub fn is_finite(&self) -> bool {
        self.elevation_deg.is_finite() && self.azimuth_deg.is_finite() && self.slant_range_km.is_finite()
    }

    pub fn is_above(&self, mask_deg: f64) -> bool {
        self.elevation_deg >= mask_deg
    }
}

/// Source of look angles over time
pub trait OrbitPropagator: Send + Sync {
    /// Look angles at `t`, or `None` when no position can be resolved.
    fn look_angles(&self, t: DateTime<Utc>) -> Option<LookAngles>;
}

impl<P: OrbitPropagator + ?Sized> OrbitPropagator for &P {
    fn look_angles(&self, t: DateTime<Utc>) -> Option<LookAngles> {
        (**self).look_angles(t)
    }
}

impl<P: OrbitPropagator + ?Sized> OrbitPropagator for Box<P> {
    fn look_angles(&self, t: DateTime<Utc>) -> Option<LookAngles> {
        (**self).look_angles(t)
    }
}
