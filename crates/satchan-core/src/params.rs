//! Link Parameters
//!
//! Every model in this crate takes its inputs from [`LinkParams`]. Each
//! optional field has an explicit default so a partially specified
//! configuration (from YAML or from a builder) is always complete.
//!
//! ## Units
//!
//! | Field              | Unit      | Default  |
//! |--------------------|-----------|----------|
//! | frequency          | GHz       | 12.0     |
//! | rain rate          | mm/h      | 0.0      |
//! | elevation          | deg       | 45.0     |
//! | TEC                | TECU      | 50.0     |
//! | antenna XPD        | dB        | 35.0     |
//! | slant range        | km        | 35786.0  |
//! | beamwidth          | deg       | 2.0      |
//! | bandwidth          | MHz       | 36.0     |
//! | simulation time    | s         | 0.0      |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SatchanError, SatchanResult};

/// Smallest frequency any model will see. Terms divide by powers of the
/// frequency, so zero must never reach them.
pub const MIN_FREQUENCY_GHZ: f64 = 1e-6;

/// Geostationary slant range used as the reference for relative FSPL.
pub const GEO_RANGE_KM: f64 = 35_786.0;

/// Propagation environment around the ground terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Open terrain, direct path only
    #[default]
    Rural,
    /// Light shadowing and vegetation scatter
    Suburban,
    /// Heavy shadowing and building scatter
    Urban,
    /// Sea-surface two-ray reflection
    Maritime,
}

impl Environment {
    pub fn all() -> &'static [Environment] {
        &[Self::Rural, Self::Suburban, Self::Urban, Self::Maritime]
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rural => write!(f, "rural"),
            Self::Suburban => write!(f, "suburban"),
            Self::Urban => write!(f, "urban"),
            Self::Maritime => write!(f, "maritime"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rural" => Ok(Self::Rural),
            "suburban" => Ok(Self::Suburban),
            "urban" => Ok(Self::Urban),
            "maritime" => Ok(Self::Maritime),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

/// Geometry, frequency, environment and atmospheric state for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParams {
    /// Carrier frequency (GHz)
    pub frequency_ghz: f64,
    /// Rain rate (mm/h)
    pub rain_rate_mm_h: f64,
    /// Geometric (pre-refraction) elevation, may be negative (deg)
    pub elevation_deg: f64,
    pub environment: Environment,
    /// Total electron content (TECU)
    pub tec_tecu: f64,
    /// Antenna cross-polar discrimination (dB)
    pub antenna_xpd_db: f64,
    /// Multiplier on rain specific attenuation
    pub rain_correction_factor: f64,
    /// Slant range to the satellite (km)
    pub slant_range_km: f64,
    /// Antenna half-power beamwidth (deg); 0 disables pointing loss
    pub beamwidth_deg: f64,
    /// Occupied bandwidth used for dispersion and noise (MHz)
    pub bandwidth_mhz: f64,
    /// Simulation time driving the fading oscillator; 0 means static
    pub sim_time_s: f64,
    pub phased_array: bool,
    /// Additive gas attenuation correction (dB)
    pub gas_offset_db: f64,
    /// Additive scatter tap power correction (dB)
    pub scatter_offset_db: f64,
    pub disable_fast_fading: bool,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            frequency_ghz: 12.0,
            rain_rate_mm_h: 0.0,
            elevation_deg: 45.0,
            environment: Environment::Rural,
            tec_tecu: 50.0,
            antenna_xpd_db: 35.0,
            rain_correction_factor: 1.0,
            slant_range_km: GEO_RANGE_KM,
            beamwidth_deg: 2.0,
            bandwidth_mhz: 36.0,
            sim_time_s: 0.0,
            phased_array: false,
            gas_offset_db: 0.0,
            scatter_offset_db: 0.0,
            disable_fast_fading: false,
        }
    }
}

impl LinkParams {
    /// Create a new builder starting from the defaults
    pub fn builder() -> LinkParamsBuilder {
        LinkParamsBuilder::default()
    }

    /// Frequency clamped away from zero
    pub fn effective_frequency_ghz(&self) -> f64 {
        if self.frequency_ghz.is_finite() {
            self.frequency_ghz.max(MIN_FREQUENCY_GHZ)
        } else {
            MIN_FREQUENCY_GHZ
        }
    }

    /// True when the fading oscillator contributes to this snapshot
    pub fn fast_fading_active(&self) -> bool {
        !self.disable_fast_fading && self.sim_time_s != 0.0 && self.sim_time_s.is_finite()
    }

    /// Check every field against its physical domain.
    pub fn validate(&self) -> SatchanResult<()> {
        let checks: [(&'static str, f64, bool); 6] = [
            ("frequency_ghz", self.frequency_ghz, self.frequency_ghz > 0.0),
            ("rain_rate_mm_h", self.rain_rate_mm_h, self.rain_rate_mm_h >= 0.0),
            ("slant_range_km", self.slant_range_km, self.slant_range_km > 0.0),
            ("beamwidth_deg", self.beamwidth_deg, self.beamwidth_deg >= 0.0),
            ("bandwidth_mhz", self.bandwidth_mhz, self.bandwidth_mhz > 0.0),
            (
                "elevation_deg",
                self.elevation_deg,
                (-90.0..=90.0).contains(&self.elevation_deg),
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(SatchanError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Builder for [`LinkParams`]
#[derive(Debug, Clone, Default)]
pub struct LinkParamsBuilder {
    params: LinkParams,
}

impl LinkParamsBuilder {
    pub fn frequency_ghz(mut self, freq: f64) -> Self {
        self.params.frequency_ghz = freq;
        self
    }

    pub fn rain_rate_mm_h(mut self, rate: f64) -> Self {
        self.params.rain_rate_mm_h = rate;
        self
    }

    pub fn elevation_deg(mut self, elevation: f64) -> Self {
        self.params.elevation_deg = elevation;
        self
    }

    pub fn environment(mut self, env: Environment) -> Self {
        self.params.environment = env;
        self
    }

    pub fn tec_tecu(mut self, tec: f64) -> Self {
        self.params.tec_tecu = tec;
        self
    }

    pub fn antenna_xpd_db(mut self, xpd: f64) -> Self {
        self.params.antenna_xpd_db = xpd;
        self
    }

    pub fn rain_correction_factor(mut self, factor: f64) -> Self {
        self.params.rain_correction_factor = factor;
        self
    }

    pub fn slant_range_km(mut self, range: f64) -> Self {
        self.params.slant_range_km = range;
        self
    }

    pub fn beamwidth_deg(mut self, beamwidth: f64) -> Self {
        self.params.beamwidth_deg = beamwidth;
        self
    }

    pub fn bandwidth_mhz(mut self, bw: f64) -> Self {
        self.params.bandwidth_mhz = bw;
        self
    }

    pub fn sim_time_s(mut self, t: f64) -> Self {
        self.params.sim_time_s = t;
        self
    }

    pub fn phased_array(mut self, enabled: bool) -> Self {
        self.params.phased_array = enabled;
        self
    }

    pub fn gas_offset_db(mut self, offset: f64) -> Self {
        self.params.gas_offset_db = offset;
        self
    }

    pub fn scatter_offset_db(mut self, offset: f64) -> Self {
        self.params.scatter_offset_db = offset;
        self
    }

    pub fn disable_fast_fading(mut self, disabled: bool) -> Self {
        self.params.disable_fast_fading = disabled;
        self
    }

    pub fn build(self) -> LinkParams {
        self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = LinkParams::default();
        assert_eq!(p.tec_tecu, 50.0);
        assert_eq!(p.antenna_xpd_db, 35.0);
        assert_eq!(p.rain_correction_factor, 1.0);
        assert_eq!(p.slant_range_km, GEO_RANGE_KM);
        assert_eq!(p.beamwidth_deg, 2.0);
        assert_eq!(p.sim_time_s, 0.0);
        assert!(!p.fast_fading_active());
    }

    #[test]
    fn test_frequency_clamp() {
        let p = LinkParams::builder().frequency_ghz(0.0).build();
        assert_eq!(p.effective_frequency_ghz(), MIN_FREQUENCY_GHZ);
        let p = LinkParams::builder().frequency_ghz(f64::NAN).build();
        assert_eq!(p.effective_frequency_ghz(), MIN_FREQUENCY_GHZ);
    }

    #[test]
    fn test_validate_rejects_negative_rain() {
        let p = LinkParams::builder().rain_rate_mm_h(-1.0).build();
        assert!(matches!(
            p.validate(),
            Err(SatchanError::InvalidParameter { name: "rain_rate_mm_h", .. })
        ));
        assert!(LinkParams::default().validate().is_ok());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("Urban".parse::<Environment>(), Ok(Environment::Urban));
        assert!("desert".parse::<Environment>().is_err());
        for env in Environment::all() {
            assert_eq!(env.to_string().parse::<Environment>(), Ok(*env));
        }
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let p: LinkParams =
            serde_json::from_str(r#"{"frequency_ghz": 30.0, "environment": "maritime"}"#).unwrap();
        assert_eq!(p.frequency_ghz, 30.0);
        assert_eq!(p.environment, Environment::Maritime);
        assert_eq!(p.tec_tecu, 50.0);
    }

    #[test]
    fn test_fast_fading_gate() {
        let p = LinkParams::builder().sim_time_s(12.0).build();
        assert!(p.fast_fading_active());
        let p = LinkParams::builder()
            .sim_time_s(12.0)
            .disable_fast_fading(true)
            .build();
        assert!(!p.fast_fading_active());
    }
}
