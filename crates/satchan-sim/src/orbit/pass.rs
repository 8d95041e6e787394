//! Pass prediction by fixed-step scanning

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::OrbitPropagator;

/// One visibility window above the elevation mask
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassWindow {
    /// Acquisition of signal
    pub aos: DateTime<Utc>,
    /// Time of closest approach (highest elevation)
    pub tca: DateTime<Utc>,
    /// Loss of signal
    pub los: DateTime<Utc>,
    pub max_elevation_deg: f64,
}

impl PassWindow {
    pub fn duration(&self) -> Duration {
        self.los - self.aos
    }
}

/// Scans a propagator for the next pass above an elevation mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassScanner {
    pub step_s: f64,
    pub elevation_mask_deg: f64,
}

impl Default for PassScanner {
    fn default() -> Self {
        Self {
            step_s: 10.0,
            elevation_mask_deg: 0.0,
        }
    }
}

impl PassScanner {
    pub fn new(step_s: f64, elevation_mask_deg: f64) -> Self {
        Self {
            step_s,
            elevation_mask_deg,
        }
    }

    /// First pass starting within `search` of `start`.
    ///
    /// A pass still in progress at the end of the window is returned with
    /// LOS at the window end. Unresolvable timestamps count as not visible.
    pub fn next_pass(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        search: Duration,
    ) -> Option<PassWindow> {
        if !(self.step_s > 0.0) || !self.step_s.is_finite() {
            return None;
        }
        let step = Duration::milliseconds((self.step_s * 1000.0).round().max(1.0) as i64);
        let end = start + search;

        let mut aos: Option<DateTime<Utc>> = None;
        let mut tca = start;
        let mut max_el = f64::NEG_INFINITY;
        let mut t = start;

        while t <= end {
            let visible = propagator
                .look_angles(t)
                .filter(|la| la.is_above(self.elevation_mask_deg));

            match (visible, aos) {
                (Some(la), _) => {
                    if aos.is_none() {
                        aos = Some(t);
                    }
                    if la.elevation_deg > max_el {
                        max_el = la.elevation_deg;
                        tca = t;
                    }
                }
                (None, Some(aos_t)) => {
                    return Some(PassWindow {
                        aos: aos_t,
                        tca,
                        los: t,
                        max_elevation_deg: max_el,
                    });
                }
                (None, None) => {}
            }

            t += step;
        }

        aos.map(|aos_t| PassWindow {
            aos: aos_t,
            tca,
            los: end,
            max_elevation_deg: max_el,
        })
    }

    /// All passes within `search` of `start`, in time order.
    pub fn passes(
        &self,
        propagator: &dyn OrbitPropagator,
        start: DateTime<Utc>,
        search: Duration,
    ) -> Vec<PassWindow> {
        let end = start + search;
        let mut passes = Vec::new();
        let mut cursor = start;
        while cursor < end {
            match self.next_pass(propagator, cursor, end - cursor) {
                Some(pass) => {
                    let next = pass.los;
                    passes.push(pass);
                    if next <= cursor || next >= end {
                        break;
                    }
                    cursor = next;
                }
                None => break,
            }
        }
        passes
    }
}
