//! Rain attenuation (ITU-R P.838 power law, P.618 path reduction)
//!
//! Specific attenuation follows γ = k · R^α (dB/km). The slant path through
//! the rain layer assumes a 3 km rain height and is shortened by the
//! reduction factor r = 1 / (1 + 0.045 · L_s).
//!
//! Coefficients come from a small table keyed by frequency and are picked by
//! nearest neighbour on |f − f_row|. No interpolation is done between rows.

/// Rain layer height above the terminal (km)
pub const RAIN_HEIGHT_KM: f64 = 3.0;

/// A row of the P.838 coefficient table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainCoefficients {
    pub freq_ghz: f64,
    pub k: f64,
    pub alpha: f64,
}

/// Coefficient rows at S, Ku, Ka, Q and V band anchor frequencies.
const P838_TABLE: &[RainCoefficients] = &[
    RainCoefficients { freq_ghz: 2.2,  k: 0.000188, alpha: 0.985 },
    RainCoefficients { freq_ghz: 12.0, k: 0.0188,   alpha: 1.217 },
    RainCoefficients { freq_ghz: 30.0, k: 0.187,    alpha: 1.021 },
    RainCoefficients { freq_ghz: 40.0, k: 0.350,    alpha: 0.939 },
    RainCoefficients { freq_ghz: 50.0, k: 0.536,    alpha: 0.873 },
];

/// Nearest table row by absolute frequency difference.
///
/// Ties resolve to the lower-frequency row.
pub fn coefficients(freq_ghz: f64) -> RainCoefficients {
    let mut best = P838_TABLE[0];
    let mut best_diff = (freq_ghz - best.freq_ghz).abs();
    for row in &P838_TABLE[1..] {
        let diff = (freq_ghz - row.freq_ghz).abs();
        if diff < best_diff {
            best = *row;
            best_diff = diff;
        }
    }
    best
}

/// Specific attenuation γ in dB/km, scaled by the calibration factor.
pub fn specific_attenuation_db_km(freq_ghz: f64, rain_rate_mm_h: f64, correction: f64) -> f64 {
    let rate = rain_rate_mm_h.max(0.0);
    if rate == 0.0 {
        return 0.0;
    }
    let c = coefficients(freq_ghz);
    c.k * rate.powf(c.alpha) * correction
}

/// Slant path length through the rain layer (km) for a floored sin(elevation).
pub fn slant_path_km(sin_elevation: f64) -> f64 {
    RAIN_HEIGHT_KM / sin_elevation
}

/// Path reduction factor for a given slant path.
pub fn reduction_factor(slant_path_km: f64) -> f64 {
    1.0 / (1.0 + 0.045 * slant_path_km)
}

/// Total rain attenuation along the slant path (dB).
pub fn rain_attenuation_db(
    freq_ghz: f64,
    rain_rate_mm_h: f64,
    correction: f64,
    sin_elevation: f64,
) -> f64 {
    let gamma = specific_attenuation_db_km(freq_ghz, rain_rate_mm_h, correction);
    if gamma == 0.0 {
        return 0.0;
    }
    let path = slant_path_km(sin_elevation);
    gamma * path * reduction_factor(path)
}
