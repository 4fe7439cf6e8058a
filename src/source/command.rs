//! Status source backed by an external command (`ipsec statusall <conn>`)

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::{SourceError, StatusSource};
use crate::config::SourceConfig;
use crate::status::Connection;

/// Runs `<program> <args...> <connection name>` and captures stdout
#[derive(Debug, Clone)]
pub struct CommandStatusSource {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandStatusSource {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Kill the command if it runs longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone()).with_timeout(config.timeout)
    }

    /// Command line for `connection`, used in logs and errors
    #[must_use]
    pub fn command_line(&self, connection: &Connection) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line.push(' ');
        line.push_str(connection.name.as_str());
        line
    }
}

impl Default for CommandStatusSource {
    fn default() -> Self {
        Self::from_config(&SourceConfig::default())
    }
}

#[async_trait]
impl StatusSource for CommandStatusSource {
    async fn status_output(&self, connection: &Connection) -> Result<String, SourceError> {
        let command_line = self.command_line(connection);
        debug!("Running {}", command_line);

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(connection.name.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, command.output())
                .await
                .map_err(|_| SourceError::Timeout {
                    command: command_line.clone(),
                    timeout,
                })?,
            None => command.output().await,
        }
        .map_err(|source| SourceError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(SourceError::ExitStatus {
                command: command_line,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
