//! Configuration validation
//!
//! Most invariants are carried by the types (non-empty names, non-zero
//! port, metrics path shape). This checks what the types cannot.

use anyhow::Result;
use std::collections::HashSet;

use super::types::Config;

impl Config {
    /// Validate configuration for correctness
    ///
    /// - At least one connection configured
    /// - Connection names are unique
    pub fn validate(&self) -> Result<()> {
        if self.connections.is_empty() {
            return Err(anyhow::anyhow!(
                "Configuration must have at least one connection"
            ));
        }

        let mut seen = HashSet::new();
        for connection in &self.connections {
            if !seen.insert(connection.name.as_str()) {
                return Err(anyhow::anyhow!(
                    "Connection '{}' is configured more than once",
                    connection.name
                ));
            }
        }

        if self.source.command.trim().is_empty() {
            return Err(anyhow::anyhow!("Status command cannot be empty"));
        }

        if self.source.timeout.is_some_and(|t| t.is_zero()) {
            tracing::warn!(
                "Status command timeout is 0s; every query will time out. \
                 Remove the setting to disable the timeout."
            );
        }

        Ok(())
    }
}
