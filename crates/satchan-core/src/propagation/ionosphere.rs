//! Ionospheric effects driven by total electron content
//!
//! Faraday rotation, group delay and chromatic dispersion all scale with
//! TEC and an inverse power of frequency, and with the obliquity 1/sin(e).
//!
//! ```text
//!   Ω(deg)      = 108 · TEC / (f² · sin e)
//!   τ_g(ns)     = 134 · TEC / (f² · sin e)
//!   Δτ(ns)      = 2 · 134 · TEC · B / (f³ · sin e)     (B in GHz)
//! ```
//!
//! TEC in TECU, f in GHz.

/// Dispersion below which the symbol rate is treated as unlimited (ns)
const MIN_DISPERSION_NS: f64 = 0.001;

/// Reported symbol rate when dispersion is negligible (MBaud)
pub const UNLIMITED_SYMBOL_RATE_MBAUD: f64 = 1.0e6;

/// Faraday rotation angle in degrees.
pub fn faraday_rotation_deg(tec_tecu: f64, freq_ghz: f64, sin_elevation: f64) -> f64 {
    108.0 * tec_tecu / (freq_ghz * freq_ghz * sin_elevation)
}

/// Ionospheric group delay in nanoseconds.
pub fn group_delay_ns(tec_tecu: f64, freq_ghz: f64, sin_elevation: f64) -> f64 {
    134.0 * tec_tecu / (freq_ghz * freq_ghz * sin_elevation)
}

/// Differential group delay across the occupied bandwidth (ns).
pub fn dispersion_ns(
    tec_tecu: f64,
    freq_ghz: f64,
    bandwidth_mhz: f64,
    sin_elevation: f64,
) -> f64 {
    2.0 * 134.0 * tec_tecu * (bandwidth_mhz / 1000.0) / (freq_ghz.powi(3) * sin_elevation)
}

/// Highest symbol rate whose period is twice the dispersion (MBaud).
pub fn max_symbol_rate_mbaud(dispersion_ns: f64) -> f64 {
    if dispersion_ns > MIN_DISPERSION_NS {
        1000.0 / (2.0 * dispersion_ns)
    } else {
        UNLIMITED_SYMBOL_RATE_MBAUD
    }
}
