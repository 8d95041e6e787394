//! Timeline frames and their flattened export rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use satchan_core::cir::{ChannelImpulseResponse, CirTapRow};
use satchan_core::link_budget::LinkBudgetResult;
use satchan_core::mimo::MimoCapacity;

use crate::orbit::LookAngles;

/// One epoch of a channel time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrame {
    pub timestamp: DateTime<Utc>,
    /// Position among emitted frames, starting at 0
    pub index: usize,
    /// Fading oscillator time used for this frame (s)
    pub sim_time_s: f64,
    /// Geometry as reported by the propagator; elevation may be negative
    pub geometry: LookAngles,
    /// True when the geometric elevation is below 0°
    pub below_horizon: bool,
    pub budget: LinkBudgetResult,
    pub rx_power_dbm: f64,
    pub noise_floor_dbm: f64,
    pub system_temperature_k: f64,
    pub cn0_dbhz: f64,
    /// Floored at −30 dB
    pub snr_db: f64,
    pub capacity: MimoCapacity,
    pub cir: ChannelImpulseResponse,
}

/// Scalar summary of a frame for CSV-style export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub slant_range_km: f64,
    pub below_horizon: bool,
    pub fspl_db: f64,
    pub rain_attenuation_db: f64,
    pub gas_attenuation_db: f64,
    pub cloud_attenuation_db: f64,
    pub scintillation_loss_db: f64,
    pub total_loss_db: f64,
    pub xpd_db: f64,
    pub sky_noise_temp_k: f64,
    pub rx_power_dbm: f64,
    pub noise_floor_dbm: f64,
    pub snr_db: f64,
    pub rank1_bps_hz: f64,
    pub rank2_bps_hz: f64,
    pub rms_delay_spread_ns: f64,
    pub coherence_bandwidth_mhz: f64,
}

/// One CIR tap tagged with its frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameTapRow {
    pub frame_index: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub tap: CirTapRow,
}

impl TimelineFrame {
    pub fn row(&self) -> TimelineRow {
        TimelineRow {
            index: self.index,
            timestamp: self.timestamp,
            elevation_deg: self.geometry.elevation_deg,
            azimuth_deg: self.geometry.azimuth_deg,
            slant_range_km: self.geometry.slant_range_km,
            below_horizon: self.below_horizon,
            fspl_db: self.budget.fspl_db,
            rain_attenuation_db: self.budget.rain_attenuation_db,
            gas_attenuation_db: self.budget.gas_attenuation_db,
            cloud_attenuation_db: self.budget.cloud_attenuation_db,
            scintillation_loss_db: self.budget.scintillation_loss_db,
            total_loss_db: self.budget.total_loss_db,
            xpd_db: self.budget.xpd_db,
            sky_noise_temp_k: self.budget.sky_noise_temp_k,
            rx_power_dbm: self.rx_power_dbm,
            noise_floor_dbm: self.noise_floor_dbm,
            snr_db: self.snr_db,
            rank1_bps_hz: self.capacity.rank1_bps_hz,
            rank2_bps_hz: self.capacity.rank2_bps_hz,
            rms_delay_spread_ns: self.cir.rms_delay_spread_ns,
            coherence_bandwidth_mhz: self.cir.coherence_bandwidth_mhz,
        }
    }

    pub fn tap_rows(&self) -> Vec<FrameTapRow> {
        self.cir
            .tap_rows()
            .into_iter()
            .map(|tap| FrameTapRow {
                frame_index: self.index,
                timestamp: self.timestamp,
                tap,
            })
            .collect()
    }
}

/// Flattened per-tap table for a whole timeline.
pub fn tap_table(frames: &[TimelineFrame]) -> Vec<FrameTapRow> {
    frames.iter().flat_map(TimelineFrame::tap_rows).collect()
}
