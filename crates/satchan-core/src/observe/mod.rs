//! # Observability
//!
//! Structured logging via `tracing`. Library code only emits events; the
//! application decides where they go by calling [`init_logging`].

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
