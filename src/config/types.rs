//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::status::Connection;
use crate::types::{HostName, MetricsPath, Port, option_duration_serde};

/// Main exporter configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// HTTP exporter settings
    #[serde(default)]
    pub exporter: ExporterConfig,
    /// How status text is obtained
    #[serde(default)]
    pub source: SourceConfig,
    /// Connections to report on
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// HTTP exporter settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExporterConfig {
    /// Host/IP to bind to (default: 0.0.0.0)
    #[serde(default = "super::defaults::host")]
    pub host: HostName,
    /// Port to listen on (default: 9536)
    #[serde(default = "super::defaults::port")]
    pub port: Port,
    /// Path serving the Prometheus text format (default: /metrics)
    #[serde(default = "super::defaults::metrics_path")]
    pub metrics_path: MetricsPath,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            host: super::defaults::host(),
            port: super::defaults::port(),
            metrics_path: super::defaults::metrics_path(),
        }
    }
}

impl ExporterConfig {
    /// Formatted listen address, e.g. "0.0.0.0:9536"
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Status command settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Program to run (default: ipsec)
    #[serde(default = "super::defaults::command")]
    pub command: String,
    /// Arguments placed before the connection name (default: ["statusall"])
    #[serde(default = "super::defaults::args")]
    pub args: Vec<String>,
    /// Seconds before a status command is abandoned
    #[serde(
        with = "option_duration_serde",
        default = "super::defaults::timeout",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    /// ipsec.conf to discover additional connections from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipsec_conf: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            command: super::defaults::command(),
            args: super::defaults::args(),
            timeout: super::defaults::timeout(),
            ipsec_conf: None,
        }
    }
}
