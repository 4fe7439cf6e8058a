//! Command-line argument parsing for the exporter binary

use crate::types::{HostName, Port};
use clap::Parser;
use std::path::PathBuf;

/// Parse port from command line argument
fn parse_port(s: &str) -> Result<Port, String> {
    let port: u16 = s
        .parse()
        .map_err(|e| format!("Invalid port number: {}", e))?;
    Port::try_new(port).map_err(|e| format!("Invalid port: {}", e))
}

/// Parse a non-empty host from command line argument
fn parse_host(s: &str) -> Result<HostName, String> {
    HostName::new(s.to_string()).map_err(|e| format!("Invalid host: {}", e))
}

/// Prometheus exporter for strongSwan IPsec tunnels
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", env = "IPSEC_EXPORTER_CONFIG")]
    pub config: String,

    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "IPSEC_EXPORTER_PORT", value_parser = parse_port)]
    pub port: Option<Port>,

    /// Host to bind to (overrides config file)
    #[arg(long, env = "IPSEC_EXPORTER_HOST", value_parser = parse_host)]
    pub host: Option<HostName>,

    /// ipsec.conf to discover connections from (overrides config file)
    #[arg(long, env = "IPSEC_EXPORTER_IPSEC_CONF")]
    pub ipsec_conf: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, env = "IPSEC_EXPORTER_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Run a single collection pass, print the metrics and exit
    #[arg(long)]
    pub once: bool,
}

impl Args {
    /// Get effective port (from args or config)
    #[must_use]
    pub fn effective_port(&self, config_port: Port) -> Port {
        self.port.unwrap_or(config_port)
    }

    /// Get effective host (from args or config)
    #[must_use]
    pub fn effective_host<'a>(&'a self, config_host: &'a HostName) -> &'a HostName {
        self.host.as_ref().unwrap_or(config_host)
    }
}
