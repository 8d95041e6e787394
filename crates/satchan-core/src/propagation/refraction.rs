//! Tropospheric refraction
//!
//! Bending of the ray through the troposphere raises the apparent
//! elevation above the geometric one. The correction uses the ITU-R
//! (Bennett-type) expression, in arc-minutes:
//!
//! ```text
//!   R = 1.02 / tan((e + 10.3 / (e + 5.11)) · π/180)
//! ```

/// Refraction correction in degrees.
///
/// The geometric elevation is clamped to ≥ 0° inside the formula; below the
/// horizon the correction saturates at its horizon value (~0.48°).
pub fn refraction_correction_deg(elevation_deg: f64) -> f64 {
    let e = if elevation_deg.is_finite() {
        elevation_deg.max(0.0)
    } else {
        0.0
    };
    let arg_deg = e + 10.3 / (e + 5.11);
    1.02 / arg_deg.to_radians().tan() / 60.0
}

/// Apparent elevation: the signed geometric elevation plus the correction.
pub fn apparent_elevation_deg(elevation_deg: f64) -> f64 {
    let base = if elevation_deg.is_finite() { elevation_deg } else { 0.0 };
    base + refraction_correction_deg(elevation_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_degree_bound() {
        let app = apparent_elevation_deg(5.0);
        assert!(app > 5.0 && app < 5.3, "apparent = {app:.4}");
    }

    #[test]
    fn test_horizon_finite() {
        let corr = refraction_correction_deg(0.0);
        assert!(corr.is_finite());
        assert!((corr - 0.48).abs() < 0.02, "horizon correction = {corr:.3}");
        assert_eq!(refraction_correction_deg(-10.0), corr);
        assert!((apparent_elevation_deg(-10.0) - (-10.0 + corr)).abs() < 1e-12);
    }

    #[test]
    fn test_decreases_with_elevation() {
        assert!(refraction_correction_deg(2.0) > refraction_correction_deg(20.0));
        assert!(refraction_correction_deg(80.0).abs() < 0.01);
    }
}
