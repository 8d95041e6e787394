//! Dual-polarization MIMO capacity
//!
//! Rank 1 is plain Shannon capacity. Rank 2 treats the two polarizations as
//! parallel streams that share the transmit power and leak into each other
//! through the cross-polar discrimination:
//!
//! ```text
//!   C1   = log2(1 + SNR)
//!   SINR = (SNR/2) / (1 + (SNR/2) · 10^(−XPD/10))
//!   C2   = 2 · log2(1 + SINR)
//! ```
//!
//! This is an approximation. A full treatment would take the eigenvalues of
//! H·Hᴴ for the 2×2 polarization channel; here the cross-talk is folded into
//! an interference term per stream.

use serde::{Deserialize, Serialize};

/// Spectral efficiency for one and two spatial streams (bps/Hz)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MimoCapacity {
    pub rank1_bps_hz: f64,
    pub rank2_bps_hz: f64,
}

impl MimoCapacity {
    /// Ratio of dual-stream to single-stream capacity
    pub fn multiplexing_gain(&self) -> f64 {
        if self.rank1_bps_hz > 0.0 {
            self.rank2_bps_hz / self.rank1_bps_hz
        } else {
            1.0
        }
    }
}

/// Capacity for a given SNR and cross-polar discrimination (both dB).
pub fn capacity(snr_db: f64, xpd_db: f64) -> MimoCapacity {
    let snr = 10f64.powf(snr_db / 10.0);
    let crosstalk = 10f64.powf(-xpd_db / 10.0);
    let half = snr / 2.0;
    let sinr = half / (1.0 + half * crosstalk);
    MimoCapacity {
        rank1_bps_hz: (1.0 + snr).log2(),
        rank2_bps_hz: 2.0 * (1.0 + sinr).log2(),
    }
}
