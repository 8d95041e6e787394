//! Calibration parameters and the fitted profile

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::LinkParams;

/// Number of free parameters in the fit
pub const NUM_PARAMETERS: usize = 5;

/// One of the five bias corrections fitted against measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationParameter {
    RainCorrectionFactor,
    GasOffsetDb,
    ScatterOffsetDb,
    EirpOffsetDb,
    TsysOffsetK,
}

impl CalibrationParameter {
    /// Parameters in vector order
    pub const ALL: [CalibrationParameter; NUM_PARAMETERS] = [
        Self::RainCorrectionFactor,
        Self::GasOffsetDb,
        Self::ScatterOffsetDb,
        Self::EirpOffsetDb,
        Self::TsysOffsetK,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RainCorrectionFactor => "rain_correction_factor",
            Self::GasOffsetDb => "gas_offset_db",
            Self::ScatterOffsetDb => "scatter_offset_db",
            Self::EirpOffsetDb => "eirp_offset_db",
            Self::TsysOffsetK => "tsys_offset_k",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::RainCorrectionFactor => "",
            Self::GasOffsetDb | Self::ScatterOffsetDb | Self::EirpOffsetDb => "dB",
            Self::TsysOffsetK => "K",
        }
    }

    /// Inclusive (min, max) range
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Self::RainCorrectionFactor => (0.5, 2.0),
            Self::GasOffsetDb => (-2.0, 2.0),
            Self::ScatterOffsetDb => (-10.0, 10.0),
            Self::EirpOffsetDb => (-6.0, 6.0),
            Self::TsysOffsetK => (-100.0, 200.0),
        }
    }

    /// Nominal step; the Jacobian perturbation is a tenth of this
    pub fn step(&self) -> f64 {
        match self {
            Self::RainCorrectionFactor => 0.05,
            Self::GasOffsetDb => 0.1,
            Self::ScatterOffsetDb => 0.5,
            Self::EirpOffsetDb => 0.1,
            Self::TsysOffsetK => 5.0,
        }
    }

    /// Identity value (no correction)
    pub fn default_value(&self) -> f64 {
        match self {
            Self::RainCorrectionFactor => 1.0,
            _ => 0.0,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.bounds();
        if value.is_nan() {
            self.default_value()
        } else {
            value.clamp(lo, hi)
        }
    }
}

impl fmt::Display for CalibrationParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Values of the five corrections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParameters {
    pub rain_correction_factor: f64,
    pub gas_offset_db: f64,
    pub scatter_offset_db: f64,
    pub eirp_offset_db: f64,
    pub tsys_offset_k: f64,
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self {
            rain_correction_factor: 1.0,
            gas_offset_db: 0.0,
            scatter_offset_db: 0.0,
            eirp_offset_db: 0.0,
            tsys_offset_k: 0.0,
        }
    }
}

impl CalibrationParameters {
    pub fn get(&self, param: CalibrationParameter) -> f64 {
        match param {
            CalibrationParameter::RainCorrectionFactor => self.rain_correction_factor,
            CalibrationParameter::GasOffsetDb => self.gas_offset_db,
            CalibrationParameter::ScatterOffsetDb => self.scatter_offset_db,
            CalibrationParameter::EirpOffsetDb => self.eirp_offset_db,
            CalibrationParameter::TsysOffsetK => self.tsys_offset_k,
        }
    }

    pub fn set(&mut self, param: CalibrationParameter, value: f64) {
        match param {
            CalibrationParameter::RainCorrectionFactor => self.rain_correction_factor = value,
            CalibrationParameter::GasOffsetDb => self.gas_offset_db = value,
            CalibrationParameter::ScatterOffsetDb => self.scatter_offset_db = value,
            CalibrationParameter::EirpOffsetDb => self.eirp_offset_db = value,
            CalibrationParameter::TsysOffsetK => self.tsys_offset_k = value,
        }
    }

    pub fn to_array(&self) -> [f64; NUM_PARAMETERS] {
        CalibrationParameter::ALL.map(|p| self.get(p))
    }

    pub fn from_array(values: [f64; NUM_PARAMETERS]) -> Self {
        let mut params = Self::default();
        for (p, v) in CalibrationParameter::ALL.iter().zip(values) {
            params.set(*p, v);
        }
        params
    }

    /// Clamp every value into its declared range
    pub fn clamped(&self) -> Self {
        Self::from_array(CalibrationParameter::ALL.map(|p| p.clamp(self.get(p))))
    }

    pub fn is_within_bounds(&self) -> bool {
        CalibrationParameter::ALL.iter().all(|p| {
            let (lo, hi) = p.bounds();
            (lo..=hi).contains(&self.get(*p))
        })
    }

    /// Link parameters with the propagation corrections merged in.
    ///
    /// Rain, gas and scatter terms replace the corresponding fields. EIRP and
    /// system temperature offsets belong to the receiver stage.
    pub fn apply(&self, params: &LinkParams) -> LinkParams {
        LinkParams {
            rain_correction_factor: self.rain_correction_factor,
            gas_offset_db: self.gas_offset_db,
            scatter_offset_db: self.scatter_offset_db,
            ..params.clone()
        }
    }
}

/// Row of the parameter table shown to users
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRow {
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

/// Result of a calibration run.
///
/// The default profile is uncalibrated with every parameter at identity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationProfile {
    pub calibrated: bool,
    pub timestamp: Option<DateTime<Utc>>,
    pub data_points: usize,
    pub rms_residual: Option<f64>,
    pub reference_satellite: Option<String>,
    pub iterations: usize,
    pub parameters: CalibrationParameters,
}

impl CalibrationProfile {
    /// Shorthand for `self.parameters.apply(params)`
    pub fn apply(&self, params: &LinkParams) -> LinkParams {
        self.parameters.apply(params)
    }

    pub fn parameter_table(&self) -> Vec<ParameterRow> {
        CalibrationParameter::ALL
            .iter()
            .map(|p| {
                let (min, max) = p.bounds();
                ParameterRow {
                    name: p.name(),
                    value: self.parameters.get(*p),
                    min,
                    max,
                    unit: p.unit(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_identity() {
        let profile = CalibrationProfile::default();
        assert!(!profile.calibrated);
        assert_eq!(profile.data_points, 0);
        assert!(profile.timestamp.is_none());
        for p in CalibrationParameter::ALL {
            assert_eq!(profile.parameters.get(p), p.default_value());
        }
        let link = LinkParams::default();
        assert_eq!(profile.apply(&link), link);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let wild = CalibrationParameters::from_array([5.0, -3.0, 20.0, f64::NAN, -1e9]);
        let c = wild.clamped();
        assert_eq!(c.rain_correction_factor, 2.0);
        assert_eq!(c.gas_offset_db, -2.0);
        assert_eq!(c.scatter_offset_db, 10.0);
        assert_eq!(c.eirp_offset_db, 0.0);
        assert_eq!(c.tsys_offset_k, -100.0);
        assert!(c.is_within_bounds());
        assert!(!wild.is_within_bounds());
    }

    #[test]
    fn test_array_order() {
        let p = CalibrationParameters::from_array([1.5, 0.1, 0.2, 0.3, 4.0]);
        assert_eq!(p.to_array(), [1.5, 0.1, 0.2, 0.3, 4.0]);
        assert_eq!(p.get(CalibrationParameter::TsysOffsetK), 4.0);
    }

    #[test]
    fn test_apply_merges_propagation_terms() {
        let p = CalibrationParameters {
            rain_correction_factor: 1.3,
            gas_offset_db: 0.4,
            scatter_offset_db: -2.0,
            eirp_offset_db: 1.0,
            tsys_offset_k: 10.0,
        };
        let link = p.apply(&LinkParams::builder().frequency_ghz(20.0).build());
        assert_eq!(link.frequency_ghz, 20.0);
        assert_eq!(link.rain_correction_factor, 1.3);
        assert_eq!(link.gas_offset_db, 0.4);
        assert_eq!(link.scatter_offset_db, -2.0);
    }

    #[test]
    fn test_parameter_table() {
        let table = CalibrationProfile::default().parameter_table();
        assert_eq!(table.len(), NUM_PARAMETERS);
        assert_eq!(table[4].name, "tsys_offset_k");
        assert_eq!((table[4].min, table[4].max), (-100.0, 200.0));
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = CalibrationProfile {
            calibrated: true,
            timestamp: "2024-05-01T12:00:00Z".parse().ok(),
            data_points: 3,
            rms_residual: Some(0.42),
            reference_satellite: Some("ASTRA-1KR".into()),
            iterations: 7,
            parameters: CalibrationParameters::default(),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("2024-05-01T12:00:00Z"));
        let back: CalibrationProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
