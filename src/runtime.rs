//! Startup and shutdown utilities for the exporter binary
//!
//! This module provides:
//! - Configuration loading with CLI overrides and startup logging
//! - Listener binding
//! - Shutdown signal handling

use anyhow::Result;
use tracing::info;

use crate::args::Args;
use crate::config::{Config, ConfigSource, load_config_with_fallback};
use crate::types::{HostName, Port};

/// Wait for shutdown signal (Ctrl+C or SIGTERM on Unix)
#[allow(clippy::expect_used)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Load configuration, apply CLI overrides and log the connections
///
/// # Errors
/// Returns error if configuration loading fails
pub fn load_and_log_config(args: &Args) -> Result<(Config, ConfigSource)> {
    let (config, source) = load_config_with_fallback(&args.config, args.ipsec_conf.as_deref())?;

    info!("Loaded configuration from {}", source.description());
    info!("Monitoring {} connection(s):", config.connections.len());
    for connection in &config.connections {
        if connection.ignored {
            info!("  - {} ({}, ignored)", connection.name, connection.auth);
        } else {
            info!("  - {} ({})", connection.name, connection.auth);
        }
    }

    Ok((config, source))
}

/// Extract listen address from CLI args or config
///
/// Prefers CLI args over config values.
#[must_use]
pub fn resolve_listen_address(args: &Args, config: &Config) -> (HostName, Port) {
    let host = args.effective_host(&config.exporter.host).clone();
    let port = args.effective_port(config.exporter.port);
    (host, port)
}

/// Bind TCP listener and log startup information
///
/// # Errors
/// Returns error if binding fails
pub async fn bind_listener(
    host: &HostName,
    port: Port,
    metrics_path: &str,
) -> Result<tokio::net::TcpListener> {
    let listen_addr = format!("{}:{}", host, port.get());
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", listen_addr, e))?;

    info!("IPsec exporter listening on http://{}{}", listen_addr, metrics_path);

    Ok(listener)
}
