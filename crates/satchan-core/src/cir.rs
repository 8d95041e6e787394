//! Channel Impulse Response engine
//!
//! Builds a tapped-delay-line description of the Earth-space channel for one
//! snapshot: the line-of-sight path, environment-specific multipath
//! components and, when dispersion is significant, an ionospheric tap.
//!
//! ```text
//!   tap 0   LOS             delay = R/c,  power = −(FSPL + excess loss)
//!   tap 1   sea reflection  maritime only, ρ = −0.85, φ = π
//!   tap 1,2 scatter         urban / suburban, fixed delays and powers
//!   tap n   ionospheric     only when dispersion > 0.01 ns
//! ```
//!
//! Which taps exist depends only on the environment and the dispersion
//! threshold. Time variation enters through tap phases, driven by the
//! deterministic fading oscillator.
//!
//! RMS delay spread is the power-weighted standard deviation of excess delay
//! over all taps (LOS included), and coherence bandwidth is 1/(5·τ_rms).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use crate::fading::fading_value;
use crate::link_budget::{compute_link_budget, LinkBudgetResult};
use crate::params::{Environment, LinkParams};
use crate::propagation::shadowing::MARITIME_ANTENNA_HEIGHT_M;
use crate::propagation::{slant_sin, C_M_PER_NS};

/// Sea-surface reflection coefficient (amplitude)
pub const SEA_REFLECTION_COEFFICIENT: f64 = -0.85;

/// Dispersion above which an ionospheric tap is added (ns)
pub const IONOSPHERIC_TAP_THRESHOLD_NS: f64 = 0.01;

/// Coherence bandwidth reported for a single-path channel (MHz)
pub const FLAT_CHANNEL_COHERENCE_MHZ: f64 = 1.0e6;

/// Delay spread below which the channel counts as flat (ns)
const MIN_DELAY_SPREAD_NS: f64 = 0.001;

/// Phase decorrelation offset between taps (s of simulation time)
const TAP_TIME_OFFSET_S: f64 = 7.3;

/// Static phase step between taps (rad)
const STATIC_PHASE_STEP_RAD: f64 = 1.7;

/// Tap power range that converts to a finite, nonzero linear amplitude (dB)
const TAP_DB_RANGE: (f64, f64) = (-3000.0, 300.0);

/// Kind of multipath component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TapKind {
    Los,
    SeaReflection,
    ScatterNear,
    ScatterFar,
    Ionospheric,
}

impl TapKind {
    /// True for components produced by terrain scatter or reflection
    pub fn is_multipath(&self) -> bool {
        matches!(self, Self::SeaReflection | Self::ScatterNear | Self::ScatterFar)
    }
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Los => write!(f, "LOS"),
            Self::SeaReflection => write!(f, "sea-reflection"),
            Self::ScatterNear => write!(f, "scatter-near"),
            Self::ScatterFar => write!(f, "scatter-far"),
            Self::Ionospheric => write!(f, "ionospheric"),
        }
    }
}

/// One multipath component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelTap {
    /// Position in the tap list (0 = LOS)
    pub index: usize,
    pub kind: TapKind,
    /// Environment-specific description, e.g. "vegetation-scatter"
    pub label: String,
    /// Absolute propagation delay (ns)
    pub delay_ns: f64,
    /// Delay relative to the LOS tap (ns)
    pub excess_delay_ns: f64,
    /// Linear amplitude
    pub amplitude: f64,
    /// Amplitude in dB, 20·log10(amplitude)
    pub amplitude_db: f64,
    /// Phase in radians, continuous (not wrapped)
    pub phase_rad: f64,
}

impl ChannelTap {
    /// Complex tap coefficient a·e^{jφ}
    pub fn coefficient(&self) -> Complex64 {
        Complex64::from_polar(self.amplitude, self.phase_rad)
    }
}

/// Channel impulse response for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelImpulseResponse {
    /// Taps in insertion order, LOS first
    pub taps: Vec<ChannelTap>,
    /// Power-weighted RMS excess delay (ns)
    pub rms_delay_spread_ns: f64,
    /// Coherence bandwidth (MHz)
    pub coherence_bandwidth_mhz: f64,
    /// Absolute free-space path loss (dB)
    pub fspl_db: f64,
    /// Every non-spreading loss on the path (dB)
    pub total_atmospheric_loss_db: f64,
}

/// Flattened tap row for tabular export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirTapRow {
    pub tap_index: usize,
    pub kind: TapKind,
    pub label: String,
    pub delay_ns: f64,
    pub excess_delay_ns: f64,
    pub amplitude_db: f64,
    pub phase_rad: f64,
}

impl ChannelImpulseResponse {
    /// The direct path; always present.
    pub fn los(&self) -> &ChannelTap {
        &self.taps[0]
    }

    /// Channel frequency response at an offset from the carrier.
    ///
    /// H(f) = Σ a_i · e^{jφ_i} · e^{−j2π f τ_i}, using excess delays.
    pub fn frequency_response(&self, offset_mhz: f64) -> Complex64 {
        self.taps
            .iter()
            .map(|tap| {
                let rot = -2.0 * PI * offset_mhz * 1e-3 * tap.excess_delay_ns;
                tap.coefficient() * Complex64::from_polar(1.0, rot)
            })
            .sum()
    }

    pub fn tap_rows(&self) -> Vec<CirTapRow> {
        self.taps
            .iter()
            .map(|tap| CirTapRow {
                tap_index: tap.index,
                kind: tap.kind,
                label: tap.label.clone(),
                delay_ns: tap.delay_ns,
                excess_delay_ns: tap.excess_delay_ns,
                amplitude_db: tap.amplitude_db,
                phase_rad: tap.phase_rad,
            })
            .collect()
    }
}

/// Nominal scatter component relative to LOS
struct ScatterProfile {
    kind: TapKind,
    label: &'static str,
    excess_delay_ns: f64,
    relative_power_db: f64,
}

const URBAN_SCATTER: [ScatterProfile; 2] = [
    ScatterProfile {
        kind: TapKind::ScatterNear,
        label: "building-scatter-near",
        excess_delay_ns: 100.0,
        relative_power_db: -15.0,
    },
    ScatterProfile {
        kind: TapKind::ScatterFar,
        label: "building-scatter-far",
        excess_delay_ns: 300.0,
        relative_power_db: -22.0,
    },
];

const SUBURBAN_SCATTER: [ScatterProfile; 2] = [
    ScatterProfile {
        kind: TapKind::ScatterNear,
        label: "vegetation-scatter-near",
        excess_delay_ns: 80.0,
        relative_power_db: -18.0,
    },
    ScatterProfile {
        kind: TapKind::ScatterFar,
        label: "vegetation-scatter-far",
        excess_delay_ns: 200.0,
        relative_power_db: -25.0,
    },
];

/// Phase of a non-LOS tap at the given index.
fn tap_phase(index: usize, params: &LinkParams) -> f64 {
    if params.fast_fading_active() {
        fading_value(params.sim_time_s + index as f64 * TAP_TIME_OFFSET_S) * PI
    } else {
        (index + 1) as f64 * STATIC_PHASE_STEP_RAD
    }
}

fn make_tap(
    index: usize,
    kind: TapKind,
    label: &str,
    los_delay_ns: f64,
    excess_delay_ns: f64,
    amplitude_db: f64,
    phase_rad: f64,
) -> ChannelTap {
    let amplitude_db = if amplitude_db.is_nan() {
        TAP_DB_RANGE.0
    } else {
        amplitude_db.clamp(TAP_DB_RANGE.0, TAP_DB_RANGE.1)
    };
    ChannelTap {
        index,
        kind,
        label: label.to_string(),
        delay_ns: los_delay_ns + excess_delay_ns,
        excess_delay_ns,
        amplitude: 10f64.powf(amplitude_db / 20.0),
        amplitude_db,
        phase_rad,
    }
}

/// Compute the CIR for one snapshot.
pub fn compute_cir(params: &LinkParams) -> ChannelImpulseResponse {
    let budget = compute_link_budget(params);
    build_cir(params, &budget)
}

/// Build the CIR from an already computed link budget.
pub fn build_cir(params: &LinkParams, budget: &LinkBudgetResult) -> ChannelImpulseResponse {
    let freq = params.effective_frequency_ghz();
    let excess_loss_db = budget.excess_loss_db();
    let los_db = -(budget.fspl_db + excess_loss_db);
    let los_delay_ns = params.slant_range_km.max(0.0) * 1000.0 / C_M_PER_NS;

    let mut taps = vec![make_tap(0, TapKind::Los, "LOS", los_delay_ns, 0.0, los_db, 0.0)];

    match params.environment {
        Environment::Maritime => {
            let sin_e = slant_sin(budget.apparent_elevation_deg);
            let excess = 2.0 * MARITIME_ANTENNA_HEIGHT_M * sin_e / C_M_PER_NS;
            let power_db = los_db + 20.0 * SEA_REFLECTION_COEFFICIENT.abs().log10();
            taps.push(make_tap(
                taps.len(),
                TapKind::SeaReflection,
                "sea-reflection",
                los_delay_ns,
                excess,
                power_db,
                PI,
            ));
        }
        Environment::Urban | Environment::Suburban => {
            let profiles = if params.environment == Environment::Urban {
                &URBAN_SCATTER
            } else {
                &SUBURBAN_SCATTER
            };
            let elevation = params.elevation_deg.clamp(0.0, 90.0);
            let elev_factor = (1.0 - elevation / 90.0).max(0.1);
            for profile in profiles.iter() {
                let index = taps.len();
                let power_db = los_db
                    + profile.relative_power_db
                    + 10.0 * elev_factor.log10()
                    + params.scatter_offset_db;
                taps.push(make_tap(
                    index,
                    profile.kind,
                    profile.label,
                    los_delay_ns,
                    profile.excess_delay_ns,
                    power_db,
                    tap_phase(index, params),
                ));
            }
        }
        Environment::Rural => {}
    }

    if budget.dispersion_ns > IONOSPHERIC_TAP_THRESHOLD_NS {
        let index = taps.len();
        let power_db = los_db - 30.0 - 10.0 * freq.log10();
        taps.push(make_tap(
            index,
            TapKind::Ionospheric,
            "ionospheric",
            los_delay_ns,
            budget.dispersion_ns,
            power_db,
            tap_phase(index, params),
        ));
    }

    let rms_delay_spread_ns = rms_delay_spread_ns(&taps);
    let coherence_bandwidth_mhz = coherence_bandwidth_mhz(rms_delay_spread_ns);

    ChannelImpulseResponse {
        taps,
        rms_delay_spread_ns,
        coherence_bandwidth_mhz,
        fspl_db: budget.fspl_db,
        total_atmospheric_loss_db: excess_loss_db,
    }
}

/// Power-weighted RMS excess delay (ns).
///
/// Weights are taken relative to the first tap so that absolute path losses
/// of hundreds of dB never underflow.
pub fn rms_delay_spread_ns(taps: &[ChannelTap]) -> f64 {
    let Some(reference) = taps.first() else {
        return 0.0;
    };
    let mut sum_w = 0.0;
    let mut sum_d = 0.0;
    let mut sum_d2 = 0.0;
    for tap in taps {
        let w = 10f64.powf((tap.amplitude_db - reference.amplitude_db) / 10.0);
        if !w.is_finite() {
            continue;
        }
        sum_w += w;
        sum_d += w * tap.excess_delay_ns;
        sum_d2 += w * tap.excess_delay_ns * tap.excess_delay_ns;
    }
    if !(sum_w > 0.0) {
        return 0.0;
    }
    let mean = sum_d / sum_w;
    let var = sum_d2 / sum_w - mean * mean;
    let spread = var.max(0.0).sqrt();
    if spread.is_finite() {
        spread
    } else {
        0.0
    }
}

/// Coherence bandwidth (MHz) for an RMS delay spread in ns.
pub fn coherence_bandwidth_mhz(rms_delay_spread_ns: f64) -> f64 {
    if rms_delay_spread_ns > MIN_DELAY_SPREAD_NS {
        1000.0 / (5.0 * rms_delay_spread_ns)
    } else {
        FLAT_CHANNEL_COHERENCE_MHZ
    }
}
