//! Default values for configuration fields
//!
//! This module centralizes all default value functions used in serde deserialization.

use crate::constants;
use crate::types::{HostName, MetricsPath, Port};
use std::time::Duration;

/// Default listen host (all interfaces)
#[inline]
#[allow(clippy::expect_used)]
pub fn host() -> HostName {
    HostName::new(constants::exporter::DEFAULT_HOST.to_string())
        .expect("default host is non-empty")
}

/// Default listen port
#[inline]
pub fn port() -> Port {
    Port::EXPORTER
}

/// Default metrics path
#[inline]
#[allow(clippy::expect_used)]
pub fn metrics_path() -> MetricsPath {
    MetricsPath::new(constants::exporter::DEFAULT_METRICS_PATH.to_string())
        .expect("default metrics path starts with '/'")
}

/// Default status command
#[inline]
pub fn command() -> String {
    constants::source::DEFAULT_COMMAND.to_string()
}

/// Default arguments placed before the connection name
#[inline]
pub fn args() -> Vec<String> {
    constants::source::DEFAULT_ARGS
        .iter()
        .map(|arg| (*arg).to_string())
        .collect()
}

/// Default status command timeout
#[inline]
pub fn timeout() -> Option<Duration> {
    Some(constants::source::DEFAULT_TIMEOUT)
}
