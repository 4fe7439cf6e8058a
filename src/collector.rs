//! Collection passes over all configured connections
//!
//! A pass queries every non-ignored connection exactly once, in config
//! order, and derives both the tunnel record and the per-user records from
//! that single output. A failing connection never aborts the pass.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::source::StatusSource;
use crate::status::{Connection, TunnelStatus, UserStatusMap, tunnel_status, users_for_tunnel};

/// Result of one collection pass
///
/// Both maps are keyed by connection name. Every configured connection has
/// an entry in each, and every user map contains the summary record under
/// the empty identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub tunnels: BTreeMap<String, TunnelStatus>,
    pub users: BTreeMap<String, UserStatusMap>,
}

impl StatusSnapshot {
    /// Number of peer sessions across all connections, summaries excluded
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.users
            .values()
            .flat_map(|users| users.values())
            .filter(|user| !user.is_summary())
            .count()
    }
}

/// Runs collection passes against a [`StatusSource`]
///
/// Cheap to clone; clones share the connection list and source.
#[derive(Clone)]
pub struct Collector {
    inner: Arc<CollectorInner>,
}

struct CollectorInner {
    connections: Vec<Connection>,
    source: Arc<dyn StatusSource>,
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("connections", &self.inner.connections)
            .finish_non_exhaustive()
    }
}

impl Collector {
    /// Create a collector for `connections`, queried through `source`
    pub fn new(connections: Vec<Connection>, source: Arc<dyn StatusSource>) -> Self {
        Self {
            inner: Arc::new(CollectorInner {
                connections,
                source,
            }),
        }
    }

    /// Configured connections, in config order
    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.inner.connections
    }

    /// Run one collection pass
    pub async fn collect(&self) -> StatusSnapshot {
        let started = Instant::now();
        let mut snapshot = StatusSnapshot::default();

        for connection in &self.inner.connections {
            let output = if connection.ignored {
                Ok(String::new())
            } else {
                self.inner.source.status_output(connection).await
            };
            let output = output.as_deref();

            let tunnel = tunnel_status(connection, output);
            let users = users_for_tunnel(connection, &tunnel, output);

            debug!(
                tunnel = %connection.name,
                status = %tunnel.status,
                up = tunnel.up,
                bytes_in = tunnel.counters.bytes_in,
                bytes_out = tunnel.counters.bytes_out,
                "Tunnel record"
            );
            for (identity, user) in &users {
                debug!(
                    tunnel = %connection.name,
                    user = %identity,
                    status = %user.status,
                    packets_in = user.counters.packets_in,
                    packets_out = user.counters.packets_out,
                    "User record"
                );
            }

            let name = connection.name.to_string();
            snapshot.tunnels.insert(name.clone(), tunnel);
            snapshot.users.insert(name, users);
        }

        debug!(
            "Collected {} connection(s), {} session(s) in {:?}",
            snapshot.tunnels.len(),
            snapshot.session_count(),
            started.elapsed()
        );

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use crate::status::{AuthMode, ConnectionStatus};
    use crate::types::ConnectionName;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        queried: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatusSource for Recording {
        async fn status_output(&self, connection: &Connection) -> Result<String, SourceError> {
            self.queried
                .lock()
                .unwrap()
                .push(connection.name.to_string());
            Ok(format!(
                "{}[1]: ESTABLISHED 5 minutes ago\n{}{{1}}:  INSTALLED, TUNNEL\n 100 bytes_i (2 pkts), 200 bytes_o (3 pkts)\n",
                connection.name, connection.name
            ))
        }
    }

    fn connection(name: &str) -> Connection {
        Connection::new(
            ConnectionName::new(name.to_string()).unwrap(),
            AuthMode::CertificateOrPsk,
        )
    }

    #[tokio::test]
    async fn test_single_query_per_connection() {
        let source = Arc::new(Recording {
            queried: Mutex::new(Vec::new()),
        });
        let collector = Collector::new(
            vec![connection("a"), connection("b").ignored(true), connection("c")],
            source.clone(),
        );

        let snapshot = collector.collect().await;

        assert_eq!(*source.queried.lock().unwrap(), vec!["a", "c"]);
        assert_eq!(snapshot.tunnels.len(), 3);
        assert_eq!(snapshot.users.len(), 3);
        assert_eq!(snapshot.tunnels["a"].status, ConnectionStatus::TunnelInstalled);
        assert_eq!(snapshot.tunnels["a"].counters.bytes_in, 100);
        assert_eq!(snapshot.tunnels["b"], TunnelStatus::ignored());
        assert_eq!(snapshot.users["b"].len(), 1);
    }

    #[tokio::test]
    async fn test_empty_collector() {
        let source = Arc::new(Recording {
            queried: Mutex::new(Vec::new()),
        });
        let snapshot = Collector::new(Vec::new(), source).collect().await;
        assert_eq!(snapshot, StatusSnapshot::default());
        assert_eq!(snapshot.session_count(), 0);
    }
}
