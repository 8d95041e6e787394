//! # Satellite Channel Models
//!
//! Propagation models for Earth-space radio links: given geometry,
//! frequency, environment and atmospheric state, this crate computes the
//! link budget, receiver noise, polarization/MIMO capacity and a multipath
//! channel impulse response.
//!
//! ## Overview
//!
//! - **Fading oscillator**: deterministic sum-of-sinusoids drift signal
//! - **Link budget**: refraction, rain, gas, cloud, Faraday rotation, XPD,
//!   shadowing, sea multipath, scan loss, scintillation, FSPL, ionospheric
//!   delay and dispersion, sky noise
//! - **CIR**: LOS, environment taps and ionospheric tap with delay spread
//! - **MIMO**: single and dual-polarization capacity
//! - **Calibration**: Levenberg-Marquardt fit of five bias corrections
//!
//! ## Model Flow
//!
//! ```text
//! LinkParams → compute_link_budget → LinkBudgetResult ─┬→ build_cir → CIR
//!                                                      └→ ReceiverConfig::levels → SNR → capacity
//! Measurements → CalibrationEngine → CalibrationProfile → LinkParams (corrected)
//! ```
//!
//! Every model is a pure function of its inputs. Simulation time is an
//! explicit field of [`LinkParams`], never read from a clock.
//!
//! ## Example
//!
//! ```rust
//! use satchan_core::{compute_cir, compute_link_budget, Environment, LinkParams};
//!
//! let params = LinkParams::builder()
//!     .frequency_ghz(12.0)
//!     .elevation_deg(45.0)
//!     .environment(Environment::Suburban)
//!     .rain_rate_mm_h(10.0)
//!     .build();
//!
//! let budget = compute_link_budget(&params);
//! let cir = compute_cir(&params);
//! assert!(budget.total_loss_db.is_finite());
//! assert_eq!(cir.taps[0].label, "LOS");
//! ```

pub mod calibration;
pub mod cir;
pub mod config;
pub mod error;
pub mod fading;
pub mod link_budget;
pub mod mimo;
pub mod observe;
pub mod params;
pub mod propagation;
pub mod receiver;
pub mod station;

pub use calibration::{CalibrationEngine, CalibrationInput, CalibrationProfile, MeasurementPoint};
pub use cir::{build_cir, compute_cir, ChannelImpulseResponse, ChannelTap, CirTapRow, TapKind};
pub use config::{SatchanConfig, TimelineSettings};
pub use error::{CalibrationError, ConfigError, SatchanError, SatchanResult};
pub use fading::fading_value;
pub use link_budget::{compute_link_budget, LinkBudgetResult};
pub use mimo::{capacity, MimoCapacity};
pub use params::{Environment, LinkParams, LinkParamsBuilder};
pub use receiver::{ReceivedLevels, ReceiverConfig};
pub use station::GroundStation;
