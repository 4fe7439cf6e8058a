//! Status sources
//!
//! A status source turns a configured connection into the raw text printed
//! by the IPsec status tool. The parser only ever sees the resulting
//! `Result<String, SourceError>`.

mod command;

pub use command::CommandStatusSource;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::status::Connection;

/// Why the status text for a connection could not be obtained
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The status command could not be started
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The status command ran but reported failure
    #[error("'{command}' exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The status command did not finish in time
    #[error("'{command}' did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// Any other source-specific failure
    #[error("{0}")]
    Other(String),
}

/// Produces raw status text for one connection
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Query the status of `connection`, once, without retrying
    async fn status_output(&self, connection: &Connection) -> Result<String, SourceError>;
}
