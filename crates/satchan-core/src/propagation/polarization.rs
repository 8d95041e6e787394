//! Polarization mismatch and cross-polarization discrimination
//!
//! Three independent mechanisms leak co-polar power into the orthogonal
//! polarization: Faraday rotation, rain depolarization and the antenna's own
//! imperfection. They are combined as a sum of linear crosstalk powers.

/// Mismatch loss cap when the rotation leaves almost nothing co-polar (dB)
pub const MAX_POLARIZATION_LOSS_DB: f64 = 60.0;

/// XPD reported for a mechanism that causes no measurable crosstalk (dB)
pub const XPD_CEILING_DB: f64 = 40.0;

/// Rain attenuation below which rain depolarization is ignored (dB)
const RAIN_XPD_THRESHOLD_DB: f64 = 0.1;

/// Polarization mismatch loss for a rotation angle, in dB.
pub fn faraday_loss_db(rotation_deg: f64) -> f64 {
    let c = rotation_deg.to_radians().cos().abs();
    if !(c >= 0.001) {
        return MAX_POLARIZATION_LOSS_DB;
    }
    -20.0 * c.log10()
}

/// XPD due to Faraday rotation alone (dB).
pub fn faraday_xpd_db(rotation_deg: f64) -> f64 {
    let t = rotation_deg.to_radians().tan().abs();
    if !(t > 1e-12) || !t.is_finite() {
        return XPD_CEILING_DB;
    }
    -20.0 * t.log10()
}

/// Rain-induced XPD, ITU-R P.618 form U − V·log10(A) (dB).
pub fn rain_xpd_db(freq_ghz: f64, rain_attenuation_db: f64) -> f64 {
    if rain_attenuation_db > RAIN_XPD_THRESHOLD_DB {
        let u = 30.0 * freq_ghz.log10();
        let v = 20.0;
        u - v * rain_attenuation_db.log10()
    } else {
        XPD_CEILING_DB
    }
}

/// Total XPD from the three mechanisms, clamped to [0, 40] dB.
pub fn combined_xpd_db(faraday_xpd_db: f64, rain_xpd_db: f64, antenna_xpd_db: f64) -> f64 {
    let crosstalk: f64 = [faraday_xpd_db, rain_xpd_db, antenna_xpd_db]
        .iter()
        .map(|xpd| 10f64.powf(-xpd / 10.0))
        .sum();
    let xpd = -10.0 * crosstalk.log10();
    if xpd.is_finite() {
        xpd.clamp(0.0, XPD_CEILING_DB)
    } else if xpd == f64::INFINITY {
        XPD_CEILING_DB
    } else {
        0.0
    }
}
