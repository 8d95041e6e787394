//! Ground antenna losses: open-loop pointing error and phased-array scan loss

/// Cosine floor for the scan-loss model (≈ 89.4° scan).
const MIN_SCAN_COSINE: f64 = 0.01;

/// Pointing loss for a parabolic-like beam, in dB.
///
/// Open-loop ephemeris pointing aims at the geometric position, so the
/// pointing error equals the refraction bending. Loss = 12·(θ/θ₃dB)².
/// A beamwidth of 0 disables the term.
pub fn pointing_loss_db(pointing_error_deg: f64, beamwidth_deg: f64) -> f64 {
    if !(beamwidth_deg > 0.0) {
        return 0.0;
    }
    12.0 * (pointing_error_deg / beamwidth_deg).powi(2)
}

/// Phased-array scan loss in dB for a boresight-up flat panel.
///
/// Scan angle is 90° minus the apparent elevation; gain rolls off as
/// cos^1.5 of it (−15·log10 cos in dB).
pub fn scan_loss_db(apparent_elevation_deg: f64) -> f64 {
    let scan_deg = 90.0 - apparent_elevation_deg;
    let cos_scan = scan_deg.to_radians().cos();
    let cos_scan = if cos_scan.is_finite() {
        cos_scan.max(MIN_SCAN_COSINE)
    } else {
        MIN_SCAN_COSINE
    };
    -15.0 * cos_scan.log10()
}
