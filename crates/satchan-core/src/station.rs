//! Ground station location

use serde::{Deserialize, Serialize};

/// Earth equatorial radius (km)
pub const R_EARTH_KM: f64 = 6378.137;

/// Mean Earth radius used for great-circle distances (km)
const R_EARTH_MEAN_KM: f64 = 6371.0;

/// WGS-84 flattening
const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Geodetic position of the receiving terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundStation {
    #[serde(alias = "lat", alias = "latitude")]
    pub latitude_deg: f64,
    #[serde(alias = "lon", alias = "longitude")]
    pub longitude_deg: f64,
    /// Altitude above the WGS-84 ellipsoid (m)
    #[serde(default, alias = "alt", alias = "altitude")]
    pub altitude_m: f64,
}

impl GroundStation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude_deg)
            && (-180.0..=360.0).contains(&self.longitude_deg)
            && self.altitude_m.is_finite()
    }

    /// Position in Earth-centred Earth-fixed coordinates (km).
    pub fn to_ecef_km(&self) -> [f64; 3] {
        let lat = self.latitude_deg.to_radians();
        let lon = self.longitude_deg.to_radians();
        let alt_km = self.altitude_m / 1000.0;

        let f = WGS84_FLATTENING;
        let e2 = 2.0 * f - f * f;
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = R_EARTH_KM / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        [
            (n + alt_km) * cos_lat * lon.cos(),
            (n + alt_km) * cos_lat * lon.sin(),
            (n * (1.0 - e2) + alt_km) * sin_lat,
        ]
    }

    /// Great-circle (haversine) distance to another station (km).
    pub fn distance_km(&self, other: &GroundStation) -> f64 {
        let phi1 = self.latitude_deg.to_radians();
        let phi2 = other.latitude_deg.to_radians();
        let dphi = phi2 - phi1;
        let dlambda = (other.longitude_deg - self.longitude_deg).to_radians();
        let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        2.0 * R_EARTH_MEAN_KM * a.sqrt().min(1.0).asin()
    }
}
