//! Core value types shared across the exporter
//!
//! Validated newtypes for configuration values live here so that invalid
//! connection names, hosts or ports are rejected at the parsing boundary.

pub mod config;
pub mod validated;

pub use config::{Port, option_duration_serde};
pub use validated::{ConnectionName, HostName, MetricsPath, ValidationError};
