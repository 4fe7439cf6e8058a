//! Tunnel-level and per-user status extraction
//!
//! The synchronous functions take the outcome of a source query and never
//! fail. The async wrappers consult a [`StatusSource`] unless the connection
//! is ignored.

use std::collections::BTreeMap;
use tracing::warn;

use super::classifier::classify;
use super::extract::extract_counters_or_zero;
use super::segmenter::Segmenter;
use super::types::{Connection, TunnelStatus, UserStatus};
use crate::source::{SourceError, StatusSource};

/// Peer records of one connection, keyed by identity
///
/// The empty identity holds the connection summary.
pub type UserStatusMap = BTreeMap<String, UserStatus>;

/// Build the tunnel record for `connection` from a source result
///
/// Ignored connections short-circuit before the output is looked at. A
/// failed query is logged and reported as `Unknown`, never as an error.
#[must_use]
pub fn tunnel_status(connection: &Connection, output: Result<&str, &SourceError>) -> TunnelStatus {
    if connection.ignored {
        return TunnelStatus::ignored();
    }

    match output {
        Ok(text) => TunnelStatus {
            up: true,
            status: classify(text),
            counters: extract_counters_or_zero(text),
        },
        Err(e) => {
            warn!(
                "Unable to retrieve the status of tunnel '{}'. Reason: {}",
                connection.name, e
            );
            TunnelStatus::unavailable()
        }
    }
}

/// Build the per-user records for `connection` from a source result
///
/// Always contains the summary record under the empty identity. On success
/// every peer session found in the text is added under its identity; a later
/// session for the same identity replaces an earlier one.
#[must_use]
pub fn user_statuses(connection: &Connection, output: Result<&str, &SourceError>) -> UserStatusMap {
    let tunnel = tunnel_status(connection, output);
    users_for_tunnel(connection, &tunnel, output)
}

/// Per-user records sharing an already computed tunnel record
pub(crate) fn users_for_tunnel(
    connection: &Connection,
    tunnel: &TunnelStatus,
    output: Result<&str, &SourceError>,
) -> UserStatusMap {
    let mut users = UserStatusMap::new();
    users.insert(String::new(), UserStatus::summary(tunnel));

    if connection.ignored {
        return users;
    }

    if let Ok(text) = output {
        for session in Segmenter::new(text, connection.auth) {
            users.insert(session.identity.clone(), session);
        }
    }

    users
}

/// Query `source` once (unless ignored) and build the tunnel record
pub async fn query_tunnel_status(
    connection: &Connection,
    source: &dyn StatusSource,
) -> TunnelStatus {
    if connection.ignored {
        return TunnelStatus::ignored();
    }

    let output = source.status_output(connection).await;
    tunnel_status(connection, output.as_deref())
}

/// Query `source` once (unless ignored) and build the per-user records
pub async fn query_user_status(connection: &Connection, source: &dyn StatusSource) -> UserStatusMap {
    if connection.ignored {
        return user_statuses(connection, Ok(""));
    }

    let output = source.status_output(connection).await;
    user_statuses(connection, output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::types::{AuthMode, ConnectionStatus, TrafficCounters};
    use crate::types::ConnectionName;

    fn connection(auth: AuthMode) -> Connection {
        Connection::new(ConnectionName::new("vpn1".to_string()).unwrap(), auth)
    }

    const INSTALLED: &str = "vpn1[5]: ESTABLISHED 1 hour ago\n\
                             vpn1{5}:  INSTALLED, TUNNEL\n\
                             vpn1{5}:   === alice \n\
                             vpn1{5}:  1000 bytes_i (10 pkts, 1s ago), 2000 bytes_o (20 pkts, 1s ago)\n";

    #[test]
    fn test_tunnel_ignored() {
        let conn = connection(AuthMode::default()).ignored(true);
        let err = SourceError::Other("must not be looked at".to_string());

        let tunnel = tunnel_status(&conn, Err(&err));

        assert!(tunnel.up);
        assert_eq!(tunnel.status, ConnectionStatus::Ignored);
    }

    #[test]
    fn test_tunnel_failure() {
        let err = SourceError::Other("boom".to_string());

        let tunnel = tunnel_status(&connection(AuthMode::default()), Err(&err));

        assert!(!tunnel.up);
        assert_eq!(tunnel.status, ConnectionStatus::Unknown);
        assert_eq!(tunnel.counters, TrafficCounters::default());
    }

    #[test]
    fn test_tunnel_success() {
        let tunnel = tunnel_status(&connection(AuthMode::default()), Ok(INSTALLED));

        assert!(tunnel.up);
        assert_eq!(tunnel.status, ConnectionStatus::TunnelInstalled);
        assert_eq!(tunnel.counters.bytes_in, 1000);
        assert_eq!(tunnel.counters.packets_out, 20);
    }

    #[test]
    fn test_tunnel_missing_counters_are_zero() {
        let tunnel = tunnel_status(&connection(AuthMode::default()), Ok("no match"));

        assert!(tunnel.up);
        assert_eq!(tunnel.status, ConnectionStatus::Down);
        assert_eq!(tunnel.counters, TrafficCounters::default());
    }

    #[test]
    fn test_users_ignored_single_placeholder() {
        let conn = connection(AuthMode::default()).ignored(true);

        let users = user_statuses(&conn, Ok(INSTALLED));

        assert_eq!(users.len(), 1);
        let placeholder = &users[""];
        assert!(placeholder.up);
        assert_eq!(placeholder.status, ConnectionStatus::Ignored);
    }

    #[test]
    fn test_users_failure_single_placeholder() {
        let err = SourceError::Other("boom".to_string());

        let users = user_statuses(&connection(AuthMode::default()), Err(&err));

        assert_eq!(users.len(), 1);
        assert!(!users[""].up);
        assert_eq!(users[""].status, ConnectionStatus::Unknown);
    }

    #[test]
    fn test_users_summary_and_peer() {
        let users = user_statuses(&connection(AuthMode::CertificateOrPsk), Ok(INSTALLED));

        assert_eq!(users.len(), 2);
        assert_eq!(users[""].status, ConnectionStatus::TunnelInstalled);
        assert_eq!(users[""].counters.bytes_out, 2000);

        let alice = &users["alice"];
        assert_eq!(alice.identity, "alice");
        assert_eq!(alice.status, ConnectionStatus::TunnelInstalled);
        assert_eq!(
            alice.counters,
            TrafficCounters {
                bytes_in: 1000,
                bytes_out: 2000,
                packets_in: 10,
                packets_out: 20,
            }
        );
    }

    #[test]
    fn test_users_duplicate_identity_last_wins() {
        let text = "=== bob 1 bytes_i (1 pkts) 1 bytes_o (1 pkts)\n\
                    === bob 2 bytes_i (2 pkts) 2 bytes_o (2 pkts)\n";

        let users = user_statuses(&connection(AuthMode::CertificateOrPsk), Ok(text));

        assert_eq!(users.len(), 2);
        assert_eq!(users["bob"].counters.bytes_in, 2);
    }
}
