//! Calibration input: measurement points and file metadata
//!
//! Two layouts are accepted:
//!
//! ```json
//! [ { "elevation_deg": 32.0, "cn0_dbhz": 78.1 }, ... ]
//! ```
//!
//! ```json
//! {
//!   "measurements": [ ... ],
//!   "metadata": {
//!     "reference_satellite": "ASTRA-1KR",
//!     "ground_station": { "latitude_deg": 48.1, "longitude_deg": 11.6 }
//!   }
//! }
//! ```
//!
//! The reference satellite is either a plain identifier or a custom object.
//! A custom object must carry frequency, EIRP, polarization and bandwidth;
//! without them the fit is underdetermined and the input is rejected.

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use crate::params::LinkParams;
use crate::receiver::ReceiverConfig;
use crate::station::GroundStation;

/// One observation. Every metric is optional; a point contributes one
/// residual per populated metric.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementPoint {
    /// Free-form time tag carried through from the input file
    pub timestamp: Option<String>,
    /// Overrides the link elevation for this point (deg)
    #[serde(alias = "elevation")]
    pub elevation_deg: Option<f64>,
    /// Overrides the link rain rate for this point (mm/h)
    #[serde(alias = "rainRate")]
    pub rain_rate_mm_h: Option<f64>,
    #[serde(alias = "cn0")]
    pub cn0_dbhz: Option<f64>,
    #[serde(alias = "rssi")]
    pub rssi_dbm: Option<f64>,
    #[serde(alias = "xpd")]
    pub xpd_db: Option<f64>,
    /// Total atmospheric attenuation (dB)
    #[serde(alias = "attenuation")]
    pub attenuation_db: Option<f64>,
    /// Legacy scalar loss, compared with the total link loss
    #[serde(alias = "measuredLoss")]
    pub measured_loss_db: Option<f64>,
    /// RMS delay spread from a channel sounder (ns)
    #[serde(alias = "delaySpread")]
    pub delay_spread_ns: Option<f64>,
}

impl MeasurementPoint {
    /// True when the point carries a metric richer than the legacy loss
    pub fn has_rich_metric(&self) -> bool {
        self.cn0_dbhz.is_some()
            || self.rssi_dbm.is_some()
            || self.xpd_db.is_some()
            || self.attenuation_db.is_some()
            || self.delay_spread_ns.is_some()
    }

    /// Link parameters for this point: per-point elevation and rain rate
    /// override the base values.
    pub fn link_params(&self, base: &LinkParams) -> LinkParams {
        let mut params = base.clone();
        if let Some(el) = self.elevation_deg {
            params.elevation_deg = el;
        }
        if let Some(rain) = self.rain_rate_mm_h {
            params.rain_rate_mm_h = rain;
        }
        params
    }
}

/// Fully specified satellite not in any lookup table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSatellite {
    pub name: Option<String>,
    #[serde(alias = "frequency")]
    pub frequency_ghz: Option<f64>,
    #[serde(alias = "eirp")]
    pub eirp_dbw: Option<f64>,
    pub polarization: Option<String>,
    #[serde(alias = "bandwidth")]
    pub bandwidth_mhz: Option<f64>,
}

impl CustomSatellite {
    /// Names of required fields that are absent
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.frequency_ghz.is_none() {
            missing.push("frequency_ghz");
        }
        if self.eirp_dbw.is_none() {
            missing.push("eirp_dbw");
        }
        if self.polarization.as_deref().map_or(true, |p| p.trim().is_empty()) {
            missing.push("polarization");
        }
        if self.bandwidth_mhz.is_none() {
            missing.push("bandwidth_mhz");
        }
        missing
    }
}

/// Reference satellite named in the metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceSatellite {
    Known(String),
    Custom(CustomSatellite),
}

impl ReferenceSatellite {
    /// Tag recorded on the resulting profile
    pub fn tag(&self) -> String {
        match self {
            Self::Known(id) => id.clone(),
            Self::Custom(sat) => sat.name.clone().unwrap_or_else(|| "custom".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        match self {
            Self::Known(_) => Ok(()),
            Self::Custom(sat) => {
                let missing = sat.missing_fields();
                if missing.is_empty() {
                    Ok(())
                } else {
                    Err(CalibrationError::IncompleteSatellite { missing })
                }
            }
        }
    }

    /// Merge a custom satellite's carrier into the forward model inputs.
    pub fn apply(&self, link: &LinkParams, receiver: &ReceiverConfig) -> (LinkParams, ReceiverConfig) {
        let mut link = link.clone();
        let mut receiver = receiver.clone();
        if let Self::Custom(sat) = self {
            if let Some(f) = sat.frequency_ghz {
                link.frequency_ghz = f;
            }
            if let Some(bw) = sat.bandwidth_mhz {
                link.bandwidth_mhz = bw;
            }
            if let Some(eirp) = sat.eirp_dbw {
                receiver.eirp_dbw = eirp;
            }
        }
        (link, receiver)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationMetadata {
    pub reference_satellite: Option<ReferenceSatellite>,
    /// Where the measurements were taken; advisory only
    pub ground_station: Option<GroundStation>,
}

/// Parsed calibration input file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub measurements: Vec<MeasurementPoint>,
    #[serde(default)]
    pub metadata: CalibrationMetadata,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputLayout {
    Bare(Vec<MeasurementPoint>),
    Wrapped(CalibrationInput),
}

impl CalibrationInput {
    pub fn new(measurements: Vec<MeasurementPoint>) -> Self {
        Self {
            measurements,
            metadata: CalibrationMetadata::default(),
        }
    }

    /// Parse either layout and validate the reference satellite.
    pub fn from_json(json: &str) -> Result<Self, CalibrationError> {
        let layout: InputLayout =
            serde_json::from_str(json).map_err(|e| CalibrationError::Parse(e.to_string()))?;
        let input = match layout {
            InputLayout::Bare(measurements) => Self::new(measurements),
            InputLayout::Wrapped(input) => input,
        };
        if let Some(sat) = &input.metadata.reference_satellite {
            sat.validate()?;
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let input = CalibrationInput::from_json(
            r#"[{"elevation_deg": 30.0, "cn0_dbhz": 80.0}, {"measuredLoss": 3.2}]"#,
        )
        .unwrap();
        assert_eq!(input.measurements.len(), 2);
        assert_eq!(input.measurements[0].cn0_dbhz, Some(80.0));
        assert!(input.measurements[0].has_rich_metric());
        assert_eq!(input.measurements[1].measured_loss_db, Some(3.2));
        assert!(!input.measurements[1].has_rich_metric());
        assert!(input.metadata.reference_satellite.is_none());
    }

    #[test]
    fn test_wrapped_with_known_satellite() {
        let input = CalibrationInput::from_json(
            r#"{
                "measurements": [{"rssi_dbm": -70.0}],
                "metadata": {
                    "reference_satellite": "EUTELSAT-7B",
                    "ground_station": {"latitude_deg": 52.0, "longitude_deg": 4.4}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(input.measurements.len(), 1);
        assert_eq!(
            input.metadata.reference_satellite.as_ref().map(|s| s.tag()),
            Some("EUTELSAT-7B".to_string())
        );
        assert!(input.metadata.ground_station.is_some());
    }

    #[test]
    fn test_incomplete_custom_satellite_rejected() {
        let err = CalibrationInput::from_json(
            r#"{
                "measurements": [],
                "metadata": {"reference_satellite": {"name": "MySat", "frequency_ghz": 20.0}}
            }"#,
        )
        .unwrap_err();
        match err {
            CalibrationError::IncompleteSatellite { missing } => {
                assert_eq!(missing, vec!["eirp_dbw", "polarization", "bandwidth_mhz"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_complete_custom_satellite_applies() {
        let input = CalibrationInput::from_json(
            r#"{
                "measurements": [{"xpd": 28.0}],
                "metadata": {"reference_satellite": {
                    "name": "KA-1", "frequency": 19.7, "eirp": 58.0,
                    "polarization": "RHCP", "bandwidth": 250.0
                }}
            }"#,
        )
        .unwrap();
        let sat = input.metadata.reference_satellite.unwrap();
        assert_eq!(sat.tag(), "KA-1");
        let (link, rx) = sat.apply(&LinkParams::default(), &ReceiverConfig::default());
        assert_eq!(link.frequency_ghz, 19.7);
        assert_eq!(link.bandwidth_mhz, 250.0);
        assert_eq!(rx.eirp_dbw, 58.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CalibrationInput::from_json("{not json"),
            Err(CalibrationError::Parse(_))
        ));
    }

    #[test]
    fn test_point_overrides() {
        let point = MeasurementPoint {
            elevation_deg: Some(12.0),
            rain_rate_mm_h: Some(5.0),
            ..Default::default()
        };
        let p = point.link_params(&LinkParams::default());
        assert_eq!(p.elevation_deg, 12.0);
        assert_eq!(p.rain_rate_mm_h, 5.0);
        assert_eq!(p.frequency_ghz, 12.0);
    }
}
