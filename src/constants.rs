//! Constants used throughout the exporter
//!
//! This module centralizes defaults and metric names to keep them in one
//! place for the binary, the config layer and the tests.

use std::time::Duration;

/// HTTP exporter defaults
pub mod exporter {
    /// Listen on all interfaces by default
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// Path Prometheus scrapes
    pub const DEFAULT_METRICS_PATH: &str = "/metrics";

    /// Path serving the last collection pass as JSON
    pub const STATUS_PATH: &str = "/status";
}

/// Status command defaults
pub mod source {
    use super::Duration;

    /// strongSwan's `ipsec` wrapper script
    pub const DEFAULT_COMMAND: &str = "ipsec";

    /// Arguments placed before the connection name
    pub const DEFAULT_ARGS: &[&str] = &["statusall"];

    /// Upper bound for a single `ipsec statusall` run
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Metric names and labels
pub mod metrics {
    pub const UP: &str = "ipsec_up";
    pub const STATUS: &str = "ipsec_tunnel_status";
    pub const BYTES_IN: &str = "ipsec_in_bytes";
    pub const BYTES_OUT: &str = "ipsec_out_bytes";
    pub const PACKETS_IN: &str = "ipsec_in_packets";
    pub const PACKETS_OUT: &str = "ipsec_out_packets";

    /// Connection name label
    pub const LABEL_TUNNEL: &str = "tunnel";
    /// Peer identity label, empty for the connection summary
    pub const LABEL_USER: &str = "user";
}

/// Environment variables recognised by the config loader
pub mod env {
    /// Prefix of the indexed connection variables, e.g. `IPSEC_CONNECTION_0_NAME`
    pub const CONNECTION_PREFIX: &str = "IPSEC_CONNECTION_";
}
