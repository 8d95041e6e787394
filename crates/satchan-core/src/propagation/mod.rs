//! Propagation sub-models
//!
//! Each submodule implements one physical effect on the Earth-space path.
//! They are deliberately small pure functions; [`crate::link_budget`]
//! composes them in dependency order.

pub mod antenna;
pub mod gaseous;
pub mod ionosphere;
pub mod polarization;
pub mod rain;
pub mod refraction;
pub mod scintillation;
pub mod shadowing;

/// Floor applied to sin(elevation) wherever it divides a path length.
pub const MIN_SIN_ELEVATION: f64 = 0.01;

/// Speed of light in m/ns (equivalently m·GHz).
pub const C_M_PER_NS: f64 = 0.299_792_458;

/// sin(elevation) floored at [`MIN_SIN_ELEVATION`].
///
/// Covers the horizon and anything below it, so slant-path terms stay
/// finite and positive.
pub fn slant_sin(elevation_deg: f64) -> f64 {
    let s = elevation_deg.to_radians().sin();
    if s.is_finite() {
        s.max(MIN_SIN_ELEVATION)
    } else {
        MIN_SIN_ELEVATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slant_sin_floor() {
        assert_eq!(slant_sin(0.0), MIN_SIN_ELEVATION);
        assert_eq!(slant_sin(-30.0), MIN_SIN_ELEVATION);
        assert!((slant_sin(90.0) - 1.0).abs() < 1e-12);
        assert!((slant_sin(30.0) - 0.5).abs() < 1e-12);
    }
}
