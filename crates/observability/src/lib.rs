//! # zirkel-observability
//!
//! Structured Logging via tracing-subscriber, als Text oder JSON.

pub mod logging;

pub use logging::{log_filter_gueltig, logging_initialisieren, LogFormat};
