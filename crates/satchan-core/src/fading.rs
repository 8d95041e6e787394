//! Deterministic fading oscillator
//!
//! Sum-of-sinusoids signal used wherever the channel needs a slowly varying
//! "random" component (scintillation, scatter tap phase drift) while staying
//! bit-reproducible: the value depends on the simulation time only.
//!
//! ```text
//!   x(t) = (1/1.581) · Σ cos(2π f_n t + φ_n),   n = 0..4
//!   f_n  = {0.11, 0.23, 0.37, 0.53, 0.79} Hz
//! ```
//!
//! Five unit cosines at non-harmonic frequencies have variance 5/2, so the
//! 1/√2.5 ≈ 1/1.581 factor yields a unit standard deviation over long windows.
//!
//! The 8-term form (`f_n = 0.1 + 0.05·n`) seen in older tooling is not
//! provided; all call sites share this oscillator.

use std::f64::consts::PI;

/// Component frequencies in Hz
pub const FADING_FREQUENCIES_HZ: [f64; 5] = [0.11, 0.23, 0.37, 0.53, 0.79];

/// Fixed phase offsets in radians
pub const FADING_PHASES_RAD: [f64; 5] = [0.0, 1.3, 2.9, 4.1, 5.7];

/// Normalization constant, √(N/2) for N = 5
pub const FADING_NORMALIZATION: f64 = 1.581;

/// Oscillator value at `sim_time_s`.
///
/// Returns exactly 0.0 at t = 0 or for a non-finite time: that is the
/// static (no fast fading) mode.
pub fn fading_value(sim_time_s: f64) -> f64 {
    if sim_time_s == 0.0 || !sim_time_s.is_finite() {
        return 0.0;
    }
    let sum: f64 = FADING_FREQUENCIES_HZ
        .iter()
        .zip(FADING_PHASES_RAD.iter())
        .map(|(f, phi)| (2.0 * PI * f * sim_time_s + phi).cos())
        .sum();
    sum / FADING_NORMALIZATION
}
