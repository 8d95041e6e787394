//! Local environment around the terminal: shadowing and sea reflection

use super::C_M_PER_NS;
use crate::params::Environment;

/// Height of a shipborne antenna above the sea surface (m)
pub const MARITIME_ANTENNA_HEIGHT_M: f64 = 15.0;

/// Two-ray gain floor, bounds the deepest fade to 20 dB
const MIN_TWO_RAY_GAIN: f64 = 0.01;

/// Shadowing loss (dB) from a linear land-mobile-satellite fit.
///
/// Maritime links have no blockage; their sea reflection is modelled by
/// [`maritime_multipath_loss_db`] instead.
pub fn shadowing_loss_db(environment: Environment, elevation_deg: f64) -> f64 {
    match environment {
        Environment::Urban => 15.0 - 0.15 * elevation_deg,
        Environment::Suburban => 6.0 - 0.05 * elevation_deg,
        Environment::Maritime => 0.0,
        Environment::Rural => 0.5,
    }
}

/// Two-ray direct/sea-reflected interference loss (dB).
///
/// Negative values are constructive gain (up to +6 dB).
pub fn maritime_multipath_loss_db(freq_ghz: f64, apparent_elevation_deg: f64) -> f64 {
    let sin_e = apparent_elevation_deg.to_radians().sin().abs();
    let phase = 2.0 * std::f64::consts::PI * MARITIME_ANTENNA_HEIGHT_M * sin_e * freq_ghz
        / C_M_PER_NS;
    let gain = 4.0 * phase.sin().powi(2);
    let gain = if gain.is_finite() {
        gain.max(MIN_TWO_RAY_GAIN)
    } else {
        MIN_TWO_RAY_GAIN
    };
    -10.0 * gain.log10()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urban_worse_than_suburban() {
        for el in [5.0, 30.0, 60.0] {
            assert!(
                shadowing_loss_db(Environment::Urban, el)
                    > shadowing_loss_db(Environment::Suburban, el)
            );
        }
        assert_eq!(shadowing_loss_db(Environment::Rural, 10.0), 0.5);
        assert_eq!(shadowing_loss_db(Environment::Maritime, 10.0), 0.0);
    }

    #[test]
    fn test_two_ray_bounds() {
        for i in 0..900 {
            let el = i as f64 * 0.1;
            let loss = maritime_multipath_loss_db(12.0, el);
            assert!(loss <= 20.0 + 1e-9, "loss {loss} at {el}");
            assert!(loss >= -10.0 * 4f64.log10() - 1e-9);
        }
    }

    #[test]
    fn test_grazing_is_deep_fade() {
        assert!((maritime_multipath_loss_db(12.0, 0.0) - 20.0).abs() < 1e-9);
    }
}
