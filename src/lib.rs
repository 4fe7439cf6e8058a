//! Prometheus exporter for strongSwan IPsec connections
//!
//! The exporter runs `ipsec statusall <connection>` for every configured
//! connection on each scrape, parses the text into tunnel and per-peer
//! records, and serves them as Prometheus metrics.
//!
//! - [`status`]: the text parser (classification, counters, session splitting)
//! - [`source`]: where status text comes from
//! - [`collector`]: one pass over all connections
//! - [`exporter`]: Prometheus projection and HTTP endpoint
//! - [`config`]: TOML, environment and `ipsec.conf` configuration

pub mod args;
pub mod collector;
pub mod config;
pub mod constants;
pub mod exporter;
pub mod logging;
pub mod runtime;
pub mod source;
pub mod status;
pub mod types;

pub use args::Args;
pub use collector::{Collector, StatusSnapshot};
pub use config::{
    Config, ConfigSource, ExporterConfig, SourceConfig, create_default_config, load_config,
    load_config_with_fallback,
};
pub use exporter::{ExporterState, StatusMetrics, render, serve};
pub use source::{CommandStatusSource, SourceError, StatusSource};
pub use status::{
    AuthMode, Connection, ConnectionStatus, TrafficCounters, TunnelStatus, UserStatus,
    query_tunnel_status, query_user_status,
};
pub use types::{ConnectionName, HostName, MetricsPath, Port, ValidationError};
