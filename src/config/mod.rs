//! Configuration module
//!
//! This module handles all configuration types and loading
//! for the exporter.

mod defaults;
mod ipsec_conf;
mod loading;
mod types;
mod validation;

// Re-export public types
pub use ipsec_conf::{load_ipsec_conf, merge_connections, parse_ipsec_conf};
pub use loading::{
    ConfigSource, connections_from_vars, create_default_config, has_connection_env_vars,
    load_config, load_config_from_env, load_config_with_fallback, load_connections_from_env,
};
pub use types::{Config, ExporterConfig, SourceConfig};

// Re-export default functions for use in tests and other modules
pub use defaults::{args, command, host, metrics_path, port, timeout};
