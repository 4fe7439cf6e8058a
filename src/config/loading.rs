//! Configuration loading from files and environment variables
//!
//! This module handles loading configuration from TOML files and environment variables,
//! with environment variables taking precedence for Docker/container deployments.

use anyhow::Result;
use std::path::Path;

use super::ipsec_conf::{load_ipsec_conf, merge_connections};
use super::types::Config;
use crate::constants::env::CONNECTION_PREFIX;
use crate::status::{AuthMode, Connection};
use crate::types::ConnectionName;

/// Where the running configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the TOML file given on the command line
    File,
    /// Built from `IPSEC_CONNECTION_<N>_*` variables
    Environment,
    /// Defaults plus the `conn` sections of an ipsec.conf given on the command line
    IpsecConf,
    /// No file or variables; a default file was written
    DefaultCreated,
}

impl ConfigSource {
    /// Human-readable description for startup logging
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::File => "configuration file",
            Self::Environment => "environment variables",
            Self::IpsecConf => "ipsec.conf discovery",
            Self::DefaultCreated => "default configuration (created)",
        }
    }
}

/// Build connections from indexed variables looked up through `var`
///
/// Reads `IPSEC_CONNECTION_0_NAME`, `IPSEC_CONNECTION_1_NAME`, ... until the
/// first missing index. Optional per-connection variables:
/// - `IPSEC_CONNECTION_N_AUTH` - `psk`, `eap` or `xauth` (default: psk)
/// - `IPSEC_CONNECTION_N_IGNORED` - `true`/`1` to skip querying
pub fn connections_from_vars<F>(var: F) -> Result<Option<Vec<Connection>>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut connections = Vec::new();

    for index in 0.. {
        let Some(name) = var(&format!("{CONNECTION_PREFIX}{index}_NAME")) else {
            break;
        };
        let name = ConnectionName::new(name)
            .map_err(|e| anyhow::anyhow!("{CONNECTION_PREFIX}{index}_NAME: {e}"))?;

        let auth = match var(&format!("{CONNECTION_PREFIX}{index}_AUTH")) {
            Some(value) => parse_auth(&value)
                .ok_or_else(|| anyhow::anyhow!("{CONNECTION_PREFIX}{index}_AUTH: unknown auth mode '{value}'"))?,
            None => AuthMode::default(),
        };

        let ignored = var(&format!("{CONNECTION_PREFIX}{index}_IGNORED"))
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        connections.push(Connection::new(name, auth).ignored(ignored));
    }

    Ok(if connections.is_empty() {
        None
    } else {
        Some(connections)
    })
}

fn parse_auth(value: &str) -> Option<AuthMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "psk" | "pubkey" | "certificate" | "certificate_or_psk" => Some(AuthMode::CertificateOrPsk),
        "eap" => Some(AuthMode::Eap),
        "xauth" => Some(AuthMode::Xauth),
        _ => None,
    }
}

/// Load connections from the process environment
pub fn load_connections_from_env() -> Result<Option<Vec<Connection>>> {
    connections_from_vars(|key| std::env::var(key).ok())
}

/// Check whether any indexed connection variable is set
#[must_use]
pub fn has_connection_env_vars() -> bool {
    std::env::var(format!("{CONNECTION_PREFIX}0_NAME")).is_ok()
}

/// Add connections discovered in `source.ipsec_conf`, then validate
fn finish(mut config: Config) -> Result<Config> {
    if let Some(path) = config.source.ipsec_conf.clone() {
        let discovered = load_ipsec_conf(&path)?;
        let added = merge_connections(&mut config.connections, discovered);
        tracing::info!(
            "Discovered {} connection(s) in {}",
            added,
            path.display()
        );
    }

    config.validate()?;
    Ok(config)
}

/// Replace `source.ipsec_conf` when a command-line path is given
fn with_ipsec_conf(mut config: Config, ipsec_conf: Option<&Path>) -> Config {
    if let Some(path) = ipsec_conf {
        config.source.ipsec_conf = Some(path.to_path_buf());
    }
    config
}

/// Parse the TOML file and apply environment connection overrides
fn read_config_file(config_path: &str) -> Result<Config> {
    let config_content = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", config_path, e))?;

    let mut config: Config = toml::from_str(&config_content)
        .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", config_path, e))?;

    if let Some(env_connections) = load_connections_from_env()? {
        tracing::info!(
            "Using {} connection(s) from environment variables (overriding config file)",
            env_connections.len()
        );
        config.connections = env_connections;
    }

    Ok(config)
}

fn config_from_env() -> Result<Config> {
    let connections = load_connections_from_env()?
        .ok_or_else(|| anyhow::anyhow!("No {}0_NAME variable set", CONNECTION_PREFIX))?;

    Ok(Config {
        connections,
        ..Default::default()
    })
}

/// Load configuration from a TOML file, with environment variable overrides
///
/// Environment variables for connections take precedence over the config file:
/// - `IPSEC_CONNECTION_0_NAME`, `IPSEC_CONNECTION_0_AUTH`, `IPSEC_CONNECTION_0_IGNORED`
/// - `IPSEC_CONNECTION_1_NAME`, ...
///
/// Connections found in `source.ipsec_conf` are appended when their name
/// is not configured already.
pub fn load_config(config_path: &str) -> Result<Config> {
    finish(read_config_file(config_path)?)
}

/// Build configuration from defaults plus environment variables only
pub fn load_config_from_env() -> Result<Config> {
    finish(config_from_env()?)
}

/// Load configuration, falling back to the environment, ipsec.conf or a generated default
///
/// `ipsec_conf` replaces `source.ipsec_conf` before validation, so its
/// connections count towards the "at least one connection" rule.
///
/// 1. The file at `config_path` if it exists
/// 2. Environment variables if `IPSEC_CONNECTION_0_NAME` is set
/// 3. Defaults plus discovery when `ipsec_conf` is given (nothing is written)
/// 4. Otherwise a default config is written to `config_path` and returned
pub fn load_config_with_fallback(
    config_path: &str,
    ipsec_conf: Option<&Path>,
) -> Result<(Config, ConfigSource)> {
    if Path::new(config_path).exists() {
        let config = with_ipsec_conf(read_config_file(config_path)?, ipsec_conf);
        return Ok((finish(config)?, ConfigSource::File));
    }

    if has_connection_env_vars() {
        let config = with_ipsec_conf(config_from_env()?, ipsec_conf);
        return Ok((finish(config)?, ConfigSource::Environment));
    }

    if ipsec_conf.is_some() {
        let config = with_ipsec_conf(Config::default(), ipsec_conf);
        return Ok((finish(config)?, ConfigSource::IpsecConf));
    }

    tracing::warn!(
        "Config file '{}' not found and no {}0_NAME set; writing a default configuration",
        config_path,
        CONNECTION_PREFIX
    );
    let config = create_default_config();
    let content = toml::to_string_pretty(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize default config: {}", e))?;
    std::fs::write(config_path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write config file '{}': {}", config_path, e))?;

    Ok((config, ConfigSource::DefaultCreated))
}

/// Create a default configuration for examples/testing
#[must_use]
#[allow(clippy::expect_used)]
pub fn create_default_config() -> Config {
    let name = ConnectionName::new("roadwarrior".to_string()).expect("valid literal name");
    Config {
        connections: vec![Connection::new(name, AuthMode::Eap)],
        ..Default::default()
    }
}
