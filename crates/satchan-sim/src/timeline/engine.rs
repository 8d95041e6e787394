//! Timeline generator
//!
//! ```text
//!   for step k in 0..N:   t_k = start + k·Δt
//!       propagator(t_k) ── None ──▶ skip (no frame)
//!              │ Some(el, az, R)
//!              ▼
//!       LinkParams { elevation = max(el, 0.1°), range = R, sim_time = k·Δt }
//!              │ (+ calibration profile when enabled)
//!              ▼
//!       link budget ─▶ CIR
//!              └─────▶ receiver levels ─▶ SNR ─▶ capacity
//! ```
//!
//! Simulation time comes from the step index, never from a clock, so a
//! timeline is reproducible for the same inputs. Skipped steps do not
//! shift the simulation time of later frames.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use satchan_core::calibration::CalibrationProfile;
use satchan_core::cir::build_cir;
use satchan_core::config::TimelineSettings;
use satchan_core::link_budget::compute_link_budget;
use satchan_core::mimo::capacity;
use satchan_core::params::LinkParams;
use satchan_core::receiver::ReceiverConfig;
use satchan_core::station::GroundStation;

use super::frame::TimelineFrame;
use crate::orbit::{KeplerianPropagator, LookAngles, OrbitPropagator, OrbitalElements};

/// Elevation floor applied before the channel models (deg)
pub const MIN_MODEL_ELEVATION_DEG: f64 = 0.1;

/// Produces channel time series from link, receiver and timeline settings.
#[derive(Debug, Clone)]
pub struct TimelineGenerator {
    link: LinkParams,
    receiver: ReceiverConfig,
    settings: TimelineSettings,
    calibration: Option<CalibrationProfile>,
}

impl TimelineGenerator {
    pub fn new(link: LinkParams, receiver: ReceiverConfig, settings: TimelineSettings) -> Self {
        Self {
            link,
            receiver,
            settings,
            calibration: None,
        }
    }

    /// Attach a calibration profile. It is applied only when
    /// `settings.use_calibration` is set.
    pub fn with_calibration(mut self, profile: CalibrationProfile) -> Self {
        self.calibration = Some(profile);
        self
    }

    pub fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    fn active_calibration(&self) -> Option<&CalibrationProfile> {
        if self.settings.use_calibration {
            self.calibration.as_ref()
        } else {
            None
        }
    }

    /// Number of steps between `start` and `end` inclusive.
    fn step_count(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        let step_s = self.settings.step_s;
        if !(step_s > 0.0) || !step_s.is_finite() || end < start {
            return 0;
        }
        let span_s = (end - start).num_milliseconds() as f64 / 1000.0;
        (span_s / step_s + 1e-9).floor() as usize + 1
    }

    fn step_time(&self, start: DateTime<Utc>, step_index: usize) -> DateTime<Utc> {
        let offset_ms = (step_index as f64 * self.settings.step_s * 1000.0).round() as i64;
        start + Duration::milliseconds(offset_ms)
    }

    /// Frames from `start` to `end`, one per step the propagator resolves.
    pub fn generate(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<TimelineFrame> {
        let steps = self.step_count(start, end);
        if steps == 0 {
            warn!(
                step_s = self.settings.step_s,
                %start,
                %end,
                "empty timeline window"
            );
            return Vec::new();
        }

        let mut frames = self.compute_steps(propagator, start, steps);
        for (index, frame) in frames.iter_mut().enumerate() {
            frame.index = index;
        }

        info!(
            frames = frames.len(),
            skipped = steps - frames.len(),
            below_horizon = frames.iter().filter(|f| f.below_horizon).count(),
            "timeline complete"
        );
        frames
    }

    /// Frames for a two-body orbit. Malformed elements or station give an
    /// empty timeline.
    pub fn generate_from_elements(
        &self,
        elements: OrbitalElements,
        station: GroundStation,
        epoch: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<TimelineFrame> {
        match KeplerianPropagator::new(elements, epoch, station) {
            Ok(propagator) => self.generate(&propagator, start, end),
            Err(e) => {
                warn!(error = %e, "cannot build trajectory, returning empty timeline");
                Vec::new()
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn compute_steps(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        steps: usize,
    ) -> Vec<TimelineFrame> {
        (0..steps)
            .into_par_iter()
            .filter_map(|k| self.frame_for_step(propagator, start, k))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_steps(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        steps: usize,
    ) -> Vec<TimelineFrame> {
        (0..steps)
            .filter_map(|k| self.frame_for_step(propagator, start, k))
            .collect()
    }

    fn frame_for_step(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        step_index: usize,
    ) -> Option<TimelineFrame> {
        let t = self.step_time(start, step_index);
        let geometry = propagator.look_angles(t).filter(LookAngles::is_finite)?;
        let sim_time_s = step_index as f64 * self.settings.step_s;
        Some(self.frame(t, sim_time_s, geometry))
    }

    /// Channel snapshot for one geometry. `index` is filled in by the caller.
    pub fn frame(&self, timestamp: DateTime<Utc>, sim_time_s: f64, geometry: LookAngles) -> TimelineFrame {
        let mut params = LinkParams {
            elevation_deg: geometry.elevation_deg.clamp(MIN_MODEL_ELEVATION_DEG, 90.0),
            slant_range_km: geometry.slant_range_km,
            sim_time_s,
            ..self.link.clone()
        };
        let (eirp_offset_db, tsys_offset_k) = match self.active_calibration() {
            Some(profile) => {
                params = profile.apply(&params);
                (profile.parameters.eirp_offset_db, profile.parameters.tsys_offset_k)
            }
            None => (0.0, 0.0),
        };

        let budget = compute_link_budget(&params);
        let cir = build_cir(&params, &budget);
        let levels = self.receiver.levels(
            budget.total_absolute_loss_db(),
            budget.sky_noise_temp_k,
            params.bandwidth_mhz,
            eirp_offset_db,
            tsys_offset_k,
        );

        TimelineFrame {
            timestamp,
            index: 0,
            sim_time_s,
            geometry,
            below_horizon: geometry.elevation_deg < 0.0,
            capacity: capacity(levels.snr_db, budget.xpd_db),
            rx_power_dbm: levels.rx_power_dbm,
            noise_floor_dbm: levels.noise_floor_dbm,
            system_temperature_k: levels.system_temperature_k,
            cn0_dbhz: levels.cn0_dbhz,
            snr_db: levels.snr_db,
            budget,
            cir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satchan_core::calibration::CalibrationParameters;
    use satchan_core::params::Environment;
    use satchan_core::receiver::MIN_SNR_DB;

    /// Replays a fixed list of geometries, one per 10 s step
    struct Scripted {
        start: DateTime<Utc>,
        script: Vec<Option<LookAngles>>,
    }

    impl OrbitPropagator for Scripted {
        fn look_angles(&self, t: DateTime<Utc>) -> Option<LookAngles> {
            let k = (t - self.start).num_seconds() / 10;
            self.script.get(usize::try_from(k).ok()?).copied().flatten()
        }
    }

    fn t0() -> DateTime<Utc> {
        "2024-07-01T12:00:00Z".parse().unwrap()
    }

    fn look(el: f64) -> Option<LookAngles> {
        Some(LookAngles {
            elevation_deg: el,
            azimuth_deg: 120.0,
            slant_range_km: 1200.0,
        })
    }

    fn generator() -> TimelineGenerator {
        TimelineGenerator::new(
            LinkParams::builder()
                .frequency_ghz(12.0)
                .environment(Environment::Suburban)
                .build(),
            ReceiverConfig::default(),
            TimelineSettings::default(),
        )
    }

    #[test]
    fn test_skips_unresolved_but_keeps_below_horizon() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(-2.0), None, look(5.0), look(20.0), None, look(10.0)],
        };
        let frames = generator().generate(&prop, t0(), t0() + Duration::seconds(50));
        assert_eq!(frames.len(), 4);

        let indices: Vec<usize> = frames.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        let sim_times: Vec<f64> = frames.iter().map(|f| f.sim_time_s).collect();
        assert_eq!(sim_times, vec![0.0, 20.0, 30.0, 50.0]);

        assert!(frames[0].below_horizon);
        assert_eq!(frames[0].geometry.elevation_deg, -2.0);
        assert!(!frames[1].below_horizon);
        for pair in frames.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[test]
    fn test_frames_are_finite() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(-30.0), look(0.0), look(0.05), look(45.0), look(90.0)],
        };
        let frames = generator().generate(&prop, t0(), t0() + Duration::seconds(40));
        assert_eq!(frames.len(), 5);
        for f in &frames {
            assert!(f.rx_power_dbm.is_finite());
            assert!(f.noise_floor_dbm.is_finite());
            assert!(f.snr_db >= MIN_SNR_DB);
            assert!(f.capacity.rank1_bps_hz.is_finite());
            assert!(f.capacity.rank2_bps_hz.is_finite());
            assert!(f.budget.total_loss_db.is_finite());
            assert!(f.cir.rms_delay_spread_ns.is_finite());
            assert_eq!(f.cir.taps[0].label, "LOS");
        }
    }

    #[test]
    fn test_first_frame_is_static() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(30.0), look(30.0)],
        };
        let frames = generator().generate(&prop, t0(), t0() + Duration::seconds(10));
        assert_eq!(frames[0].budget.scintillation_loss_db, 0.0);
        assert_ne!(frames[1].budget.scintillation_loss_db, 0.0);
    }

    #[test]
    fn test_reproducible() {
        let prop = Scripted {
            start: t0(),
            script: (0..30).map(|k| look(5.0 + k as f64)).collect(),
        };
        let g = generator();
        let a = g.generate(&prop, t0(), t0() + Duration::seconds(290));
        let b = g.generate(&prop, t0(), t0() + Duration::seconds(290));
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
    }

    #[test]
    fn test_received_power_tracks_elevation() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(5.0), look(60.0)],
        };
        let frames = generator().generate(&prop, t0(), t0() + Duration::seconds(10));
        assert!(frames[1].rx_power_dbm > frames[0].rx_power_dbm);
        // Same range: the difference is atmospheric and shadowing only
        assert_eq!(frames[0].budget.fspl_db, frames[1].budget.fspl_db);
    }

    #[test]
    fn test_calibration_applied_only_when_enabled() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(40.0)],
        };
        let profile = CalibrationProfile {
            calibrated: true,
            parameters: CalibrationParameters {
                eirp_offset_db: 3.0,
                gas_offset_db: 0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        let window = (t0(), t0());

        let off = generator()
            .with_calibration(profile.clone())
            .generate(&prop, window.0, window.1);
        let on = TimelineGenerator::new(
            LinkParams::builder().environment(Environment::Suburban).build(),
            ReceiverConfig::default(),
            TimelineSettings {
                use_calibration: true,
                ..Default::default()
            },
        )
        .with_calibration(profile)
        .generate(&prop, window.0, window.1);

        let base = generator().generate(&prop, window.0, window.1);
        assert_eq!(off, base);
        let delta = on[0].rx_power_dbm - base[0].rx_power_dbm;
        assert!((delta - 2.5).abs() < 1e-9, "delta = {delta}");
    }

    #[test]
    fn test_empty_on_bad_window_or_elements() {
        let prop = Scripted {
            start: t0(),
            script: vec![look(10.0)],
        };
        let g = generator();
        assert!(g.generate(&prop, t0(), t0() - Duration::seconds(1)).is_empty());

        let mut elements = OrbitalElements::leo_550km();
        elements.eccentricity = 2.0;
        let frames = g.generate_from_elements(
            elements,
            GroundStation::new(45.0, 7.0, 0.0),
            t0(),
            t0(),
            t0() + Duration::minutes(10),
        );
        assert!(frames.is_empty());
    }

    #[test]
    fn test_geo_timeline_from_elements() {
        let frames = generator().generate_from_elements(
            OrbitalElements::geostationary(13.0),
            GroundStation::new(45.0, 13.0, 0.0),
            t0(),
            t0(),
            t0() + Duration::minutes(5),
        );
        assert_eq!(frames.len(), 31);
        for f in &frames {
            assert!(!f.below_horizon);
            assert!((f.budget.fspl_db - frames[0].budget.fspl_db).abs() < 0.01);
        }
    }
}
