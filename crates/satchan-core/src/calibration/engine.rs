//! Levenberg-Marquardt fit of the calibration parameters
//!
//! ```text
//!   r_i   = w_i · (measured_i − predicted_i(p))
//!   J_ik  = w_i · ∂predicted_i/∂p_k          (forward difference)
//!   (JᵀJ + λ·(diag(JᵀJ) + ε)) Δp = Jᵀr
//!   p    ← clamp(p + Δp)
//! ```
//!
//! The iteration stops when the largest applied step is below the tolerance
//! or after the iteration cap. Hitting the cap is not an error: the profile
//! carries the achieved RMS residual so the caller can judge the fit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::measurement::{CalibrationInput, MeasurementPoint, ReferenceSatellite};
use super::profile::{CalibrationParameter, CalibrationParameters, CalibrationProfile, NUM_PARAMETERS};
use super::solver::solve_linear_system;
use crate::cir::build_cir;
use crate::error::CalibrationError;
use crate::link_budget::compute_link_budget;
use crate::params::LinkParams;
use crate::receiver::ReceiverConfig;
use crate::station::GroundStation;

/// Residual weight for C/N0
pub const WEIGHT_CN0: f64 = 2.0;
/// Residual weight for RSSI
pub const WEIGHT_RSSI: f64 = 1.5;
/// Residual weight for XPD
pub const WEIGHT_XPD: f64 = 1.0;
/// Residual weight for atmospheric attenuation
pub const WEIGHT_ATTENUATION: f64 = 1.5;
/// Residual weight for the legacy total-loss metric
pub const WEIGHT_LOSS: f64 = 1.0;
/// Residual weight for RMS delay spread
pub const WEIGHT_DELAY_SPREAD: f64 = 1.0;

/// Added to each diagonal entry before damping
const DIAGONAL_EPSILON: f64 = 1e-9;

/// Curvature ratio below which a parameter is treated as unobservable
const UNOBSERVABLE_RATIO: f64 = 1e-12;

/// Smallest Jacobian perturbation
const MIN_PERTURBATION: f64 = 1e-6;

/// Solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    pub max_iterations: usize,
    /// Convergence threshold on the largest parameter step
    pub tolerance: f64,
    /// Levenberg-Marquardt damping factor λ
    pub damping: f64,
    /// Where the receiver actually is; compared with input metadata
    pub ground_station: Option<GroundStation>,
    /// Distance above which a location mismatch is reported (km)
    pub station_mismatch_km: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tolerance: 1e-6,
            damping: 0.01,
            ground_station: None,
            station_mismatch_km: 50.0,
        }
    }
}

/// Which metric a residual compares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Cn0,
    Rssi,
    Xpd,
    Attenuation,
    Loss,
    DelaySpread,
}

impl Metric {
    fn weight(&self) -> f64 {
        match self {
            Self::Cn0 => WEIGHT_CN0,
            Self::Rssi => WEIGHT_RSSI,
            Self::Xpd => WEIGHT_XPD,
            Self::Attenuation => WEIGHT_ATTENUATION,
            Self::Loss => WEIGHT_LOSS,
            Self::DelaySpread => WEIGHT_DELAY_SPREAD,
        }
    }
}

/// Fits calibration parameters against measurements.
#[derive(Debug, Clone)]
pub struct CalibrationEngine {
    link: LinkParams,
    receiver: ReceiverConfig,
    settings: CalibrationSettings,
}

impl CalibrationEngine {
    pub fn new(link: LinkParams, receiver: ReceiverConfig) -> Self {
        Self {
            link,
            receiver,
            settings: CalibrationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CalibrationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &CalibrationSettings {
        &self.settings
    }

    /// Calibrate a parsed input file.
    ///
    /// Rejects an underspecified custom reference satellite. A ground
    /// station far from the configured one only produces a warning.
    pub fn calibrate_input(
        &self,
        input: &CalibrationInput,
    ) -> Result<CalibrationProfile, CalibrationError> {
        let reference = input.metadata.reference_satellite.as_ref();
        if let Some(sat) = reference {
            sat.validate()?;
        }
        if let (Some(file_gs), Some(own_gs)) =
            (input.metadata.ground_station, self.settings.ground_station)
        {
            let distance_km = file_gs.distance_km(&own_gs);
            if distance_km > self.settings.station_mismatch_km {
                warn!(
                    distance_km,
                    limit_km = self.settings.station_mismatch_km,
                    "measurement ground station differs from configured station"
                );
            }
        }
        Ok(self.calibrate(&input.measurements, reference))
    }

    /// Calibrate, stamping the profile with the current time.
    pub fn calibrate(
        &self,
        points: &[MeasurementPoint],
        reference: Option<&ReferenceSatellite>,
    ) -> CalibrationProfile {
        self.calibrate_at(points, reference, Utc::now())
    }

    /// Calibrate with an explicit timestamp.
    pub fn calibrate_at(
        &self,
        points: &[MeasurementPoint],
        reference: Option<&ReferenceSatellite>,
        timestamp: DateTime<Utc>,
    ) -> CalibrationProfile {
        if points.is_empty() {
            return CalibrationProfile::default();
        }

        let (link, receiver) = match reference {
            Some(sat) => sat.apply(&self.link, &self.receiver),
            None => (self.link.clone(), self.receiver.clone()),
        };
        let model = ForwardModel {
            points,
            link: &link,
            receiver: &receiver,
        };

        let mut params = CalibrationParameters::default();
        let mut iterations = 0;
        for iter in 0..self.settings.max_iterations {
            iterations = iter + 1;
            let residuals = model.weighted_residuals(&params);
            if residuals.is_empty() {
                break;
            }
            let jacobian = model.jacobian(&params, &residuals);
            let delta = self.damped_step(&jacobian, &residuals);

            let current = params.to_array();
            let mut max_step: f64 = 0.0;
            let mut next = current;
            for (k, param) in CalibrationParameter::ALL.iter().enumerate() {
                next[k] = param.clamp(current[k] + delta[k]);
                max_step = max_step.max((next[k] - current[k]).abs());
            }
            params = CalibrationParameters::from_array(next);

            debug!(
                iteration = iterations,
                rms = rms(&residuals),
                max_step,
                "calibration iteration"
            );
            if max_step < self.settings.tolerance {
                break;
            }
        }

        let rms_residual = rms(&model.raw_residuals(&params));
        info!(
            points = points.len(),
            iterations,
            rms_residual,
            "calibration complete"
        );

        CalibrationProfile {
            calibrated: true,
            timestamp: Some(timestamp),
            data_points: points.len(),
            rms_residual: Some(rms_residual),
            reference_satellite: reference.map(|s| s.tag()),
            iterations,
            parameters: params,
        }
    }

    /// Solve the damped normal equations for one step.
    fn damped_step(&self, jacobian: &[Vec<f64>], residuals: &[f64]) -> Vec<f64> {
        let mut jtj = vec![vec![0.0; NUM_PARAMETERS]; NUM_PARAMETERS];
        let mut jtr = vec![0.0; NUM_PARAMETERS];
        for (i, r) in residuals.iter().enumerate() {
            for a in 0..NUM_PARAMETERS {
                let ja = jacobian[a][i];
                jtr[a] += ja * r;
                for b in 0..NUM_PARAMETERS {
                    jtj[a][b] += ja * jacobian[b][i];
                }
            }
        }
        // Columns with negligible curvature relative to the best constrained
        // parameter carry only rounding noise; hold those parameters fixed.
        let max_diag = (0..NUM_PARAMETERS).map(|k| jtj[k][k]).fold(0.0, f64::max);
        for k in 0..NUM_PARAMETERS {
            if jtj[k][k] <= max_diag * UNOBSERVABLE_RATIO {
                for j in 0..NUM_PARAMETERS {
                    jtj[k][j] = 0.0;
                    jtj[j][k] = 0.0;
                }
                jtr[k] = 0.0;
            }
        }
        for (k, row) in jtj.iter_mut().enumerate() {
            row[k] += self.settings.damping * (row[k] + DIAGONAL_EPSILON);
        }
        let delta = solve_linear_system(&jtj, &jtr);
        delta
            .into_iter()
            .map(|d| if d.is_finite() { d } else { 0.0 })
            .collect()
    }
}

/// Calibrate with the default receiver, stamping the current time.
pub fn calibrate(
    points: &[MeasurementPoint],
    link: &LinkParams,
    reference: Option<&ReferenceSatellite>,
) -> CalibrationProfile {
    CalibrationEngine::new(link.clone(), ReceiverConfig::default()).calibrate(points, reference)
}

fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Predicts every populated metric for a trial parameter set
struct ForwardModel<'a> {
    points: &'a [MeasurementPoint],
    link: &'a LinkParams,
    receiver: &'a ReceiverConfig,
}

impl ForwardModel<'_> {
    /// (metric, measured − predicted) for every populated field
    fn residual_terms(&self, params: &CalibrationParameters) -> Vec<(Metric, f64)> {
        let mut terms = Vec::new();
        for point in self.points {
            let link = params.apply(&point.link_params(self.link));
            let budget = compute_link_budget(&link);
            let levels = self.receiver.levels(
                budget.total_absolute_loss_db(),
                budget.sky_noise_temp_k,
                link.bandwidth_mhz,
                params.eirp_offset_db,
                params.tsys_offset_k,
            );

            if let Some(cn0) = point.cn0_dbhz {
                terms.push((Metric::Cn0, cn0 - levels.cn0_dbhz));
            }
            if let Some(rssi) = point.rssi_dbm {
                terms.push((Metric::Rssi, rssi - levels.rx_power_dbm));
            }
            if let Some(xpd) = point.xpd_db {
                terms.push((Metric::Xpd, xpd - budget.xpd_db));
            }
            if let Some(att) = point.attenuation_db {
                terms.push((Metric::Attenuation, att - budget.atmospheric_loss_db));
            }
            if let Some(spread) = point.delay_spread_ns {
                let cir = build_cir(&link, &budget);
                terms.push((Metric::DelaySpread, spread - cir.rms_delay_spread_ns));
            }
            if !point.has_rich_metric() {
                if let Some(loss) = point.measured_loss_db {
                    terms.push((Metric::Loss, loss - budget.total_loss_db));
                }
            }
        }
        terms
    }

    fn raw_residuals(&self, params: &CalibrationParameters) -> Vec<f64> {
        self.residual_terms(params).into_iter().map(|(_, r)| r).collect()
    }

    fn weighted_residuals(&self, params: &CalibrationParameters) -> Vec<f64> {
        self.residual_terms(params)
            .into_iter()
            .map(|(m, r)| m.weight() * r)
            .collect()
    }

    /// Column k is ∂(w·predicted)/∂p_k, i.e. −∂r/∂p_k.
    fn jacobian_column(
        &self,
        params: &CalibrationParameters,
        base: &[f64],
        param: CalibrationParameter,
    ) -> Vec<f64> {
        let h = (param.step() * 0.1).max(MIN_PERTURBATION);
        let mut trial = *params;
        trial.set(param, params.get(param) + h);
        let perturbed = self.weighted_residuals(&trial);
        base.iter()
            .zip(perturbed)
            .map(|(r0, r1)| (r0 - r1) / h)
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn jacobian(&self, params: &CalibrationParameters, base: &[f64]) -> Vec<Vec<f64>> {
        CalibrationParameter::ALL
            .par_iter()
            .map(|p| self.jacobian_column(params, base, *p))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn jacobian(&self, params: &CalibrationParameters, base: &[f64]) -> Vec<Vec<f64>> {
        CalibrationParameter::ALL
            .iter()
            .map(|p| self.jacobian_column(params, base, *p))
            .collect()
    }
}
