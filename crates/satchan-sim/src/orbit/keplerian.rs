//! Two-body Keplerian propagator
//!
//! Propagates mean anomaly linearly, solves Kepler's equation by
//! Newton-Raphson, rotates through RAAN/inclination/argument of perigee and
//! finally into the Earth-fixed frame. The inertial frame is aligned with
//! the Earth-fixed frame at the element epoch, so `mean_anomaly_deg` plus
//! `arg_perigee_deg` plus `raan_deg` of a circular equatorial orbit is the
//! sub-satellite longitude at epoch.
//!
//! No perturbations are modelled. For pass-scale windows (minutes to hours)
//! this is adequate to drive the channel models; it is not a replacement for
//! SGP4 against real TLEs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use satchan_core::station::{GroundStation, R_EARTH_KM};

use super::{LookAngles, OrbitPropagator};
use crate::error::{OrbitError, OrbitResult};

/// Earth gravitational parameter (km^3/s^2)
pub const MU_EARTH: f64 = 398_600.4418;

/// Earth rotation rate (rad/s)
const OMEGA_EARTH: f64 = 7.292_115e-5;

/// Geostationary semi-major axis (km)
pub const GEO_SEMI_MAJOR_AXIS_KM: f64 = 42_164.17;

/// Keplerian orbital elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub semi_major_axis_km: f64,
    /// 0 = circular, < 1 = elliptical
    pub eccentricity: f64,
    pub inclination_deg: f64,
    /// Right ascension of ascending node
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    /// Mean anomaly at epoch
    pub mean_anomaly_deg: f64,
}

impl OrbitalElements {
    /// Circular orbit at 550 km, 53° inclination.
    pub fn leo_550km() -> Self {
        Self {
            semi_major_axis_km: R_EARTH_KM + 550.0,
            eccentricity: 0.0001,
            inclination_deg: 53.0,
            raan_deg: 0.0,
            arg_perigee_deg: 0.0,
            mean_anomaly_deg: 0.0,
        }
    }

    /// Geostationary slot at the given longitude.
    pub fn geostationary(longitude_deg: f64) -> Self {
        Self {
            semi_major_axis_km: GEO_SEMI_MAJOR_AXIS_KM,
            eccentricity: 0.0,
            inclination_deg: 0.0,
            raan_deg: 0.0,
            arg_perigee_deg: 0.0,
            mean_anomaly_deg: longitude_deg,
        }
    }

    /// Orbital period in seconds.
    pub fn period_s(&self) -> f64 {
        let a = self.semi_major_axis_km;
        2.0 * PI * (a * a * a / MU_EARTH).sqrt()
    }

    /// Reject elements that do not describe a bound orbit clear of the Earth.
    pub fn validate(&self) -> OrbitResult<()> {
        let fields = [
            self.semi_major_axis_km,
            self.eccentricity,
            self.inclination_deg,
            self.raan_deg,
            self.arg_perigee_deg,
            self.mean_anomaly_deg,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(OrbitError::InvalidElements("non-finite element".into()));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitError::InvalidElements(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        let perigee_km = self.semi_major_axis_km * (1.0 - self.eccentricity);
        if perigee_km <= R_EARTH_KM {
            return Err(OrbitError::InvalidElements(format!(
                "perigee radius {:.1} km is inside the Earth",
                perigee_km
            )));
        }
        if !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(OrbitError::InvalidElements(format!(
                "inclination {} outside [0, 180]",
                self.inclination_deg
            )));
        }
        Ok(())
    }
}

/// Two-body propagator bound to a ground station.
#[derive(Debug, Clone)]
pub struct KeplerianPropagator {
    elements: OrbitalElements,
    epoch: DateTime<Utc>,
    station: GroundStation,
}

impl KeplerianPropagator {
    pub fn new(
        elements: OrbitalElements,
        epoch: DateTime<Utc>,
        station: GroundStation,
    ) -> OrbitResult<Self> {
        elements.validate()?;
        if !station.is_valid() {
            return Err(OrbitError::InvalidStation(format!(
                "lat {} lon {} alt {}",
                station.latitude_deg, station.longitude_deg, station.altitude_m
            )));
        }
        Ok(Self {
            elements,
            epoch,
            station,
        })
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn station(&self) -> &GroundStation {
        &self.station
    }

    fn seconds_since_epoch(&self, t: DateTime<Utc>) -> f64 {
        (t - self.epoch).num_milliseconds() as f64 / 1000.0
    }

    /// Earth-fixed satellite position (km) `t_s` seconds after epoch.
    pub fn position_ecef_km(&self, t_s: f64) -> [f64; 3] {
        let el = &self.elements;
        let a = el.semi_major_axis_km;
        let e = el.eccentricity;
        let inc = el.inclination_deg.to_radians();
        let raan = el.raan_deg.to_radians();
        let omega = el.arg_perigee_deg.to_radians();
        let m0 = el.mean_anomaly_deg.to_radians();

        // Mean motion (rad/s)
        let n = (MU_EARTH / (a * a * a)).sqrt();
        let m = (m0 + n * t_s).rem_euclid(2.0 * PI);

        // Kepler's equation: E - e*sin(E) = M
        let mut ecc_anom = m;
        for _ in 0..20 {
            let delta = (ecc_anom - e * ecc_anom.sin() - m) / (1.0 - e * ecc_anom.cos());
            ecc_anom -= delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }

        let cos_e = ecc_anom.cos();
        let sin_e = ecc_anom.sin();
        let nu = ((1.0 - e * e).sqrt() * sin_e).atan2(cos_e - e);
        let r = a * (1.0 - e * cos_e);

        let x_orb = r * (nu + omega).cos();
        let y_orb = r * (nu + omega).sin();

        let (sin_raan, cos_raan) = raan.sin_cos();
        let (sin_inc, cos_inc) = inc.sin_cos();
        let x_eci = x_orb * cos_raan - y_orb * cos_inc * sin_raan;
        let y_eci = x_orb * sin_raan + y_orb * cos_inc * cos_raan;
        let z_eci = y_orb * sin_inc;

        let (sin_t, cos_t) = (OMEGA_EARTH * t_s).sin_cos();
        [
            x_eci * cos_t + y_eci * sin_t,
            -x_eci * sin_t + y_eci * cos_t,
            z_eci,
        ]
    }

    /// Look angles `t_s` seconds after epoch.
    pub fn look_angles_at(&self, t_s: f64) -> LookAngles {
        let sat = self.position_ecef_km(t_s);
        let gs = self.station.to_ecef_km();
        let dx = sat[0] - gs[0];
        let dy = sat[1] - gs[1];
        let dz = sat[2] - gs[2];

        let (sin_lat, cos_lat) = self.station.latitude_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.station.longitude_deg.to_radians().sin_cos();

        // East-North-Up at the station
        let east = -sin_lon * dx + cos_lon * dy;
        let north = -sin_lat * cos_lon * dx - sin_lat * sin_lon * dy + cos_lat * dz;
        let up = cos_lat * cos_lon * dx + cos_lat * sin_lon * dy + sin_lat * dz;

        let elevation_deg = up.atan2(east.hypot(north)).to_degrees();
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);

        LookAngles {
            elevation_deg,
            azimuth_deg,
            slant_range_km: (dx * dx + dy * dy + dz * dz).sqrt(),
        }
    }
}

impl OrbitPropagator for KeplerianPropagator {
    fn look_angles(&self, t: DateTime<Utc>) -> Option<LookAngles> {
        let angles = self.look_angles_at(self.seconds_since_epoch(t));
        angles.is_finite().then_some(angles)
    }
}
