//! Ground receiver model
//!
//! Converts the link budget into absolute levels:
//!
//! ```text
//!   T_sys   = T_lna + T_sky + 3 K (cosmic background) + ΔT_cal
//!   N (dBm) = 10·log10(k·T_sys·B) + 30
//!   P_rx    = EIRP(dBW) + 30 − L_total + G_rx
//!   C/N0    = P_rx − 10·log10(k·T_sys) − 30
//! ```

use serde::{Deserialize, Serialize};

/// Boltzmann constant (J/K)
pub const K_BOLTZMANN: f64 = 1.380649e-23;

/// Cosmic microwave background contribution (K)
pub const COSMIC_BACKGROUND_K: f64 = 3.0;

/// Floor applied to SNR so downstream capacity math stays finite (dB)
pub const MIN_SNR_DB: f64 = -30.0;

/// Smallest system temperature accepted by the noise helpers (K)
const MIN_SYSTEM_TEMPERATURE_K: f64 = 1.0;

/// Transmitter and receive-chain parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Satellite EIRP (dBW)
    pub eirp_dbw: f64,
    /// Receive antenna gain (dBi)
    pub rx_antenna_gain_dbi: f64,
    /// LNA noise temperature (K)
    pub lna_temperature_k: f64,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            eirp_dbw: 52.0,
            rx_antenna_gain_dbi: 40.0,
            lna_temperature_k: 75.0,
        }
    }
}

/// Absolute received levels for one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceivedLevels {
    pub system_temperature_k: f64,
    pub rx_power_dbm: f64,
    pub noise_floor_dbm: f64,
    pub snr_db: f64,
    pub cn0_dbhz: f64,
}

impl ReceiverConfig {
    /// Levels for a given absolute path loss and sky temperature.
    ///
    /// `eirp_offset_db` and `tsys_offset_k` carry calibration corrections;
    /// pass 0.0 for an uncalibrated receiver.
    pub fn levels(
        &self,
        total_absolute_loss_db: f64,
        sky_noise_temp_k: f64,
        bandwidth_mhz: f64,
        eirp_offset_db: f64,
        tsys_offset_k: f64,
    ) -> ReceivedLevels {
        let t_sys = system_temperature_k(self.lna_temperature_k, sky_noise_temp_k, tsys_offset_k);
        let rx = received_power_dbm(
            self.eirp_dbw + eirp_offset_db,
            total_absolute_loss_db,
            self.rx_antenna_gain_dbi,
        );
        let noise = noise_floor_dbm(t_sys, bandwidth_mhz * 1e6);
        ReceivedLevels {
            system_temperature_k: t_sys,
            rx_power_dbm: rx,
            noise_floor_dbm: noise,
            snr_db: (rx - noise).max(MIN_SNR_DB),
            cn0_dbhz: cn0_dbhz(rx, t_sys),
        }
    }
}

/// System noise temperature (K), floored at 1 K.
pub fn system_temperature_k(lna_k: f64, sky_k: f64, offset_k: f64) -> f64 {
    (lna_k + sky_k + COSMIC_BACKGROUND_K + offset_k).max(MIN_SYSTEM_TEMPERATURE_K)
}

/// Thermal noise floor in dBm.
///
/// N = 10*log10(k*T*B) + 30  (convert from dBW to dBm)
pub fn noise_floor_dbm(temperature_k: f64, bandwidth_hz: f64) -> f64 {
    let kt = K_BOLTZMANN * temperature_k.max(MIN_SYSTEM_TEMPERATURE_K);
    10.0 * (kt * bandwidth_hz.max(1.0)).log10() + 30.0
}

/// Received carrier power in dBm.
pub fn received_power_dbm(eirp_dbw: f64, total_absolute_loss_db: f64, rx_gain_dbi: f64) -> f64 {
    eirp_dbw + 30.0 - total_absolute_loss_db + rx_gain_dbi
}

/// Carrier to noise density ratio in dB-Hz.
pub fn cn0_dbhz(rx_power_dbm: f64, temperature_k: f64) -> f64 {
    rx_power_dbm - 10.0 * (K_BOLTZMANN * temperature_k.max(MIN_SYSTEM_TEMPERATURE_K)).log10() - 30.0
}
