//! Tropospheric and ionospheric scintillation
//!
//! Only the standard deviation is modelled physically. The realised fade at
//! a given instant is that sigma scaled by the deterministic fading
//! oscillator, so snapshots at the same simulation time agree exactly.

use crate::fading::fading_value;

/// Tropospheric scintillation standard deviation (dB).
pub fn tropospheric_sigma_db(freq_ghz: f64, sin_elevation: f64) -> f64 {
    0.025 * freq_ghz.powf(0.58) / sin_elevation.powf(1.2)
}

/// Ionospheric scintillation standard deviation (dB).
pub fn ionospheric_sigma_db(tec_tecu: f64, freq_ghz: f64, sin_elevation: f64) -> f64 {
    (tec_tecu / 100.0) * (2.0 / freq_ghz.powf(1.5)) / sin_elevation.powf(1.2)
}

/// Quadrature sum of both contributions (dB).
pub fn scintillation_sigma_db(tec_tecu: f64, freq_ghz: f64, sin_elevation: f64) -> f64 {
    let tropo = tropospheric_sigma_db(freq_ghz, sin_elevation);
    let iono = ionospheric_sigma_db(tec_tecu, freq_ghz, sin_elevation);
    tropo.hypot(iono)
}

/// Instantaneous scintillation loss (dB); exactly 0 when fading is inactive.
pub fn scintillation_loss_db(sigma_db: f64, sim_time_s: f64, active: bool) -> f64 {
    if !active {
        return 0.0;
    }
    fading_value(sim_time_s) * sigma_db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_is_zero() {
        let sigma = scintillation_sigma_db(50.0, 12.0, 0.5);
        assert!(sigma > 0.0);
        assert_eq!(scintillation_loss_db(sigma, 0.0, true), 0.0);
        assert_eq!(scintillation_loss_db(sigma, 42.0, false), 0.0);
    }

    #[test]
    fn test_ionosphere_dominates_at_l_band() {
        let tropo = tropospheric_sigma_db(1.5, 0.5);
        let iono = ionospheric_sigma_db(50.0, 1.5, 0.5);
        assert!(iono > tropo);
    }

    #[test]
    fn test_low_elevation_stronger() {
        assert!(scintillation_sigma_db(50.0, 12.0, 0.1) > scintillation_sigma_db(50.0, 12.0, 0.9));
    }
}
