//! Link budget engine for Earth-space propagation losses
//!
//! Computes every scalar loss and noise term for one geometry and
//! environment snapshot: refraction, pointing, rain, gas, cloud, Faraday
//! rotation, XPD, shadowing, sea multipath, phased-array scan loss,
//! scintillation, free-space path loss, ionospheric delay and dispersion,
//! and the resulting sky noise temperature.
//!
//! The engine is a pure function of [`LinkParams`]. Pathological inputs
//! (zero elevation, near-zero frequency) degrade to large but finite values.
//!
//! ## Example
//!
//! ```rust
//! use satchan_core::link_budget::compute_link_budget;
//! use satchan_core::params::{Environment, LinkParams};
//!
//! let result = compute_link_budget(
//!     &LinkParams::builder()
//!         .frequency_ghz(12.0)        // Ku band
//!         .elevation_deg(30.0)
//!         .slant_range_km(38_000.0)
//!         .environment(Environment::Suburban)
//!         .build(),
//! );
//!
//! assert!((result.fspl_db - 205.6).abs() < 1.0);
//! assert!(result.sky_noise_temp_k < 50.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::params::{Environment, LinkParams, GEO_RANGE_KM};
use crate::propagation::{
    antenna, gaseous, ionosphere, polarization, rain, refraction, scintillation, shadowing,
    slant_sin,
};

/// Ambient temperature of the lossy atmosphere (K)
pub const ATMOSPHERE_TEMPERATURE_K: f64 = 290.0;

/// Smallest slant range fed to the FSPL formula (km)
const MIN_RANGE_KM: f64 = 1e-6;

/// Every term of one link budget snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetResult {
    /// Tropospheric bending added to the geometric elevation (deg)
    pub refraction_correction_deg: f64,
    /// Elevation seen through the troposphere (deg)
    pub apparent_elevation_deg: f64,
    /// Open-loop pointing loss (dB)
    pub pointing_loss_db: f64,
    /// Rain attenuation (dB)
    pub rain_attenuation_db: f64,
    /// Gas absorption including calibration offset (dB)
    pub gas_attenuation_db: f64,
    /// Cloud attenuation (dB)
    pub cloud_attenuation_db: f64,
    /// Rain + gas + cloud (dB)
    pub atmospheric_loss_db: f64,
    /// Faraday rotation angle (deg)
    pub faraday_rotation_deg: f64,
    /// Polarization mismatch loss from Faraday rotation (dB)
    pub faraday_loss_db: f64,
    /// Combined cross-polar discrimination (dB, 0..=40)
    pub xpd_db: f64,
    /// Environmental shadowing (dB)
    pub shadowing_loss_db: f64,
    /// Sea-reflection two-ray loss, maritime only (dB, may be negative)
    pub multipath_loss_db: f64,
    /// Phased-array scan loss (dB)
    pub scan_loss_db: f64,
    /// Scintillation standard deviation (dB)
    pub scintillation_sigma_db: f64,
    /// Realised scintillation at this instant (dB)
    pub scintillation_loss_db: f64,
    /// Absolute free-space path loss (dB)
    pub fspl_db: f64,
    /// FSPL at the GEO reference range (dB)
    pub reference_fspl_db: f64,
    /// `fspl_db - reference_fspl_db` (dB)
    pub delta_fspl_db: f64,
    /// Ionospheric group delay (ns)
    pub group_delay_ns: f64,
    /// Ionospheric dispersion across the bandwidth (ns)
    pub dispersion_ns: f64,
    /// Highest symbol rate tolerated by the dispersion (MBaud)
    pub max_symbol_rate_mbaud: f64,
    /// Sum of all losses relative to the GEO reference (dB)
    pub total_loss_db: f64,
    /// Sky noise temperature seen through the atmosphere (K)
    pub sky_noise_temp_k: f64,
}

impl LinkBudgetResult {
    /// Losses other than free-space spreading (dB).
    pub fn excess_loss_db(&self) -> f64 {
        self.total_loss_db - self.delta_fspl_db
    }

    /// Absolute end-to-end path loss: FSPL plus every excess loss (dB).
    pub fn total_absolute_loss_db(&self) -> f64 {
        self.fspl_db + self.excess_loss_db()
    }
}

/// Free-space path loss in dB, range in km and frequency in GHz.
///
/// FSPL = 20·log10(d) + 20·log10(f) + 92.45
pub fn free_space_path_loss_db(range_km: f64, freq_ghz: f64) -> f64 {
    let range = if range_km.is_finite() {
        range_km.max(MIN_RANGE_KM)
    } else {
        MIN_RANGE_KM
    };
    20.0 * range.log10() + 20.0 * freq_ghz.log10() + 92.45
}

/// Blackbody sky temperature behind a lossy atmosphere (K).
///
/// A negative loss (possible once a calibration gas offset is applied)
/// counts as a transparent atmosphere.
pub fn sky_noise_temperature_k(atmospheric_loss_db: f64) -> f64 {
    let loss_db = atmospheric_loss_db.max(0.0);
    let t = ATMOSPHERE_TEMPERATURE_K * (1.0 - 10f64.powf(-loss_db / 10.0));
    if t.is_finite() {
        t
    } else {
        0.0
    }
}

/// Compute the full link budget for one snapshot.
pub fn compute_link_budget(params: &LinkParams) -> LinkBudgetResult {
    let freq = params.effective_frequency_ghz();
    let tec = params.tec_tecu.max(0.0);

    let refraction_correction_deg = refraction::refraction_correction_deg(params.elevation_deg);
    let apparent_elevation_deg = refraction::apparent_elevation_deg(params.elevation_deg);
    let sin_e = slant_sin(apparent_elevation_deg);

    let pointing_loss_db =
        antenna::pointing_loss_db(refraction_correction_deg, params.beamwidth_deg);

    let rain_attenuation_db = rain::rain_attenuation_db(
        freq,
        params.rain_rate_mm_h,
        params.rain_correction_factor,
        sin_e,
    );
    let gas_attenuation_db = gaseous::gas_attenuation_db(freq, sin_e, params.gas_offset_db);
    let cloud_attenuation_db = gaseous::cloud_attenuation_db(freq, sin_e);
    let atmospheric_loss_db = rain_attenuation_db + gas_attenuation_db + cloud_attenuation_db;

    let faraday_rotation_deg = ionosphere::faraday_rotation_deg(tec, freq, sin_e);
    let faraday_loss_db = polarization::faraday_loss_db(faraday_rotation_deg);
    let xpd_db = polarization::combined_xpd_db(
        polarization::faraday_xpd_db(faraday_rotation_deg),
        polarization::rain_xpd_db(freq, rain_attenuation_db),
        params.antenna_xpd_db,
    );

    let local_elevation = apparent_elevation_deg.clamp(0.0, 90.0);
    let shadowing_loss_db = shadowing::shadowing_loss_db(params.environment, local_elevation);
    let multipath_loss_db = match params.environment {
        Environment::Maritime => {
            shadowing::maritime_multipath_loss_db(freq, apparent_elevation_deg)
        }
        _ => 0.0,
    };

    let scan_loss_db = if params.phased_array {
        antenna::scan_loss_db(apparent_elevation_deg)
    } else {
        0.0
    };

    let scintillation_sigma_db = scintillation::scintillation_sigma_db(tec, freq, sin_e);
    let scintillation_loss_db = scintillation::scintillation_loss_db(
        scintillation_sigma_db,
        params.sim_time_s,
        params.fast_fading_active(),
    );

    let fspl_db = free_space_path_loss_db(params.slant_range_km, freq);
    let reference_fspl_db = free_space_path_loss_db(GEO_RANGE_KM, freq);
    let delta_fspl_db = fspl_db - reference_fspl_db;

    let group_delay_ns = ionosphere::group_delay_ns(tec, freq, sin_e);
    let dispersion_ns =
        ionosphere::dispersion_ns(tec, freq, params.bandwidth_mhz.max(0.0), sin_e);
    let max_symbol_rate_mbaud = ionosphere::max_symbol_rate_mbaud(dispersion_ns);

    let total_loss_db = atmospheric_loss_db
        + shadowing_loss_db
        + faraday_loss_db
        + delta_fspl_db
        + pointing_loss_db
        + scan_loss_db
        + multipath_loss_db
        + scintillation_loss_db;

    let sky_noise_temp_k = sky_noise_temperature_k(atmospheric_loss_db);

    LinkBudgetResult {
        refraction_correction_deg,
        apparent_elevation_deg,
        pointing_loss_db,
        rain_attenuation_db,
        gas_attenuation_db,
        cloud_attenuation_db,
        atmospheric_loss_db,
        faraday_rotation_deg,
        faraday_loss_db,
        xpd_db,
        shadowing_loss_db,
        multipath_loss_db,
        scan_loss_db,
        scintillation_sigma_db,
        scintillation_loss_db,
        fspl_db,
        reference_fspl_db,
        delta_fspl_db,
        group_delay_ns,
        dispersion_ns,
        max_symbol_rate_mbaud,
        total_loss_db,
        sky_noise_temp_k,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_finite(r: &LinkBudgetResult) -> bool {
        [
            r.refraction_correction_deg,
            r.apparent_elevation_deg,
            r.pointing_loss_db,
            r.rain_attenuation_db,
            r.gas_attenuation_db,
            r.cloud_attenuation_db,
            r.atmospheric_loss_db,
            r.faraday_rotation_deg,
            r.faraday_loss_db,
            r.xpd_db,
            r.shadowing_loss_db,
            r.multipath_loss_db,
            r.scan_loss_db,
            r.scintillation_sigma_db,
            r.scintillation_loss_db,
            r.fspl_db,
            r.reference_fspl_db,
            r.delta_fspl_db,
            r.group_delay_ns,
            r.dispersion_ns,
            r.max_symbol_rate_mbaud,
            r.total_loss_db,
            r.sky_noise_temp_k,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    #[test]
    fn test_fspl_known_values() {
        let geo = free_space_path_loss_db(35_786.0, 12.0);
        let leo = free_space_path_loss_db(550.0, 12.0);
        assert!((geo - 205.5).abs() < 1.0, "GEO FSPL = {geo:.2}");
        assert!((leo - 169.3).abs() < 1.0, "LEO FSPL = {leo:.2}");
        assert!((geo - leo - 36.2).abs() < 1.0, "GEO-LEO delta = {:.2}", geo - leo);
    }

    #[test]
    fn test_no_nan_sweep() {
        let envs = Environment::all();
        for &freq in &[0.0001, 0.5, 2.2, 12.0, 30.0, 75.0] {
            for el in (-90i32..=90).step_by(5) {
                for &rain in &[0.0, 10.0, 150.0] {
                    for &range in &[0.001, 550.0, 35_786.0] {
                        for &sim_time in &[0.0, 3.7] {
                            let env = envs[(el.unsigned_abs() as usize / 5) % envs.len()];
                            let p = LinkParams::builder()
                                .frequency_ghz(freq)
                                .elevation_deg(el as f64)
                                .rain_rate_mm_h(rain)
                                .slant_range_km(range)
                                .environment(env)
                                .phased_array(el % 10 == 0)
                                .sim_time_s(sim_time)
                                .build();
                            let r = compute_link_budget(&p);
                            assert!(all_finite(&r), "non-finite result for {p:?}: {r:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_vacuum_baseline() {
        let p = LinkParams::builder()
            .rain_rate_mm_h(0.0)
            .tec_tecu(0.0)
            .elevation_deg(40.0)
            .build();
        let r = compute_link_budget(&p);
        assert_eq!(r.rain_attenuation_db, 0.0);
        assert_eq!(r.faraday_loss_db, 0.0);
        assert_eq!(r.group_delay_ns, 0.0);
        assert_eq!(r.dispersion_ns, 0.0);
    }

    #[test]
    fn test_refraction_and_pointing_at_five_degrees() {
        let p = LinkParams::builder()
            .elevation_deg(5.0)
            .beamwidth_deg(2.0)
            .build();
        let r = compute_link_budget(&p);
        assert!(
            r.apparent_elevation_deg > 5.0 && r.apparent_elevation_deg < 5.3,
            "apparent = {:.4}",
            r.apparent_elevation_deg
        );
        assert!(
            r.pointing_loss_db > 0.05 && r.pointing_loss_db < 1.0,
            "pointing = {:.4}",
            r.pointing_loss_db
        );
    }

    #[test]
    fn test_pointing_disabled_with_zero_beamwidth() {
        let p = LinkParams::builder().elevation_deg(5.0).beamwidth_deg(0.0).build();
        assert_eq!(compute_link_budget(&p).pointing_loss_db, 0.0);
    }

    #[test]
    fn test_sky_noise_rain_monotonic() {
        let clear = compute_link_budget(
            &LinkParams::builder()
                .frequency_ghz(30.0)
                .rain_rate_mm_h(0.0)
                .elevation_deg(90.0)
                .environment(Environment::Suburban)
                .build(),
        );
        let heavy = compute_link_budget(
            &LinkParams::builder()
                .frequency_ghz(30.0)
                .rain_rate_mm_h(50.0)
                .elevation_deg(90.0)
                .build(),
        );
        assert!(clear.sky_noise_temp_k < 50.0, "clear T_sky = {:.1}", clear.sky_noise_temp_k);
        assert!(heavy.sky_noise_temp_k > 100.0, "rain T_sky = {:.1}", heavy.sky_noise_temp_k);

        let mut last = 0.0;
        for rain in [0.0, 1.0, 5.0, 20.0, 50.0, 100.0] {
            let r = compute_link_budget(
                &LinkParams::builder()
                    .frequency_ghz(12.0)
                    .rain_rate_mm_h(rain)
                    .elevation_deg(90.0)
                    .build(),
            );
            assert!(r.sky_noise_temp_k >= last);
            last = r.sky_noise_temp_k;
        }
        assert!(last > 100.0);
    }

    #[test]
    fn test_phased_array_scan_loss() {
        let p = LinkParams::builder()
            .elevation_deg(30.0)
            .phased_array(true)
            .build();
        let r = compute_link_budget(&p);
        assert!((r.scan_loss_db - 4.51).abs() < 0.2, "scan loss = {:.3}", r.scan_loss_db);

        let p = LinkParams::builder()
            .elevation_deg(0.0)
            .phased_array(true)
            .build();
        assert!(compute_link_budget(&p).scan_loss_db.is_finite());

        let p = LinkParams::builder().elevation_deg(30.0).build();
        assert_eq!(compute_link_budget(&p).scan_loss_db, 0.0);
    }

    #[test]
    fn test_delta_fspl_zero_at_geo() {
        let r = compute_link_budget(&LinkParams::default());
        assert!(r.delta_fspl_db.abs() < 1e-9);
        assert!((r.total_absolute_loss_db() - (r.fspl_db + r.total_loss_db)).abs() < 1e-9);
    }

    #[test]
    fn test_static_snapshot_has_no_scintillation() {
        let r = compute_link_budget(&LinkParams::default());
        assert_eq!(r.scintillation_loss_db, 0.0);
        assert!(r.scintillation_sigma_db > 0.0);

        let moving = LinkParams::builder().sim_time_s(10.0).build();
        let a = compute_link_budget(&moving);
        let b = compute_link_budget(&moving);
        assert_eq!(a, b);
        assert!(a.scintillation_loss_db != 0.0);
    }

    #[test]
    fn test_maritime_only_multipath() {
        let land = compute_link_budget(&LinkParams::builder().elevation_deg(20.0).build());
        assert_eq!(land.multipath_loss_db, 0.0);
        let sea = compute_link_budget(
            &LinkParams::builder()
                .elevation_deg(20.0)
                .environment(Environment::Maritime)
                .build(),
        );
        assert_eq!(sea.shadowing_loss_db, 0.0);
        assert!(sea.multipath_loss_db <= 20.0);
    }

    #[test]
    fn test_sky_noise_never_negative() {
        assert_eq!(sky_noise_temperature_k(-1.9), 0.0);
        assert_eq!(sky_noise_temperature_k(0.0), 0.0);

        let p = LinkParams::builder()
            .frequency_ghz(4.0)
            .elevation_deg(90.0)
            .gas_offset_db(-2.0)
            .build();
        let r = compute_link_budget(&p);
        assert!(r.atmospheric_loss_db < 0.0, "atm = {:.3}", r.atmospheric_loss_db);
        assert!(r.sky_noise_temp_k >= 0.0, "tsky = {:.2}", r.sky_noise_temp_k);
    }

    #[test]
    fn test_gas_offset_applies() {
        let base = compute_link_budget(&LinkParams::default());
        let shifted = compute_link_budget(&LinkParams::builder().gas_offset_db(0.5).build());
        assert!((shifted.gas_attenuation_db - base.gas_attenuation_db - 0.5).abs() < 1e-12);
        assert!((shifted.total_loss_db - base.total_loss_db - 0.5).abs() < 1e-9);
    }
}
