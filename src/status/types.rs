//! Status model produced by the parser
//!
//! Records are built fresh for every collection pass and never carry state
//! into the next one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ConnectionName;

/// How the remote peer of a connection authenticates
///
/// Selects the pattern used to recover the peer identity from status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Certificates or pre-shared keys; the identity is the SA name after `===`
    #[default]
    #[serde(
        rename = "psk",
        alias = "certificate",
        alias = "certificate_or_psk",
        alias = "pubkey"
    )]
    CertificateOrPsk,
    /// EAP; the identity is the bracketed peer id or the remote EAP identity
    Eap,
    /// XAuth; the identity is the remote XAuth identity
    Xauth,
}

impl AuthMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CertificateOrPsk => "psk",
            Self::Eap => "eap",
            Self::Xauth => "xauth",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured connection, immutable for the duration of a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub name: ConnectionName,
    #[serde(default)]
    pub auth: AuthMode,
    /// Administratively excluded from status checks (`auto=ignore`)
    #[serde(default)]
    pub ignored: bool,
}

impl Connection {
    #[must_use]
    pub fn new(name: ConnectionName, auth: AuthMode) -> Self {
        Self {
            name,
            auth,
            ignored: false,
        }
    }

    #[must_use]
    pub fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }
}

/// Connection state reported by the status tool
///
/// Ordered by specificity: `TunnelInstalled` refines `ConnectionEstablished`.
/// The discriminants are the values exported on the status series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    TunnelInstalled = 0,
    ConnectionEstablished = 1,
    Down = 2,
    Unknown = 3,
    Ignored = 4,
}

impl ConnectionStatus {
    /// Numeric status code exported to Prometheus
    #[must_use]
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TunnelInstalled => "tunnel installed",
            Self::ConnectionEstablished => "connection established",
            Self::Down => "down",
            Self::Unknown => "unknown",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte and packet counters for one SA, as reported by the status tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrafficCounters {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub packets_in: u64,
    pub packets_out: u64,
}

/// Aggregate status of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TunnelStatus {
    pub up: bool,
    pub status: ConnectionStatus,
    #[serde(flatten)]
    pub counters: TrafficCounters,
}

impl TunnelStatus {
    /// Placeholder for a connection excluded from checks
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            up: true,
            status: ConnectionStatus::Ignored,
            counters: TrafficCounters {
                bytes_in: 0,
                bytes_out: 0,
                packets_in: 0,
                packets_out: 0,
            },
        }
    }

    /// Record for a connection whose status could not be retrieved
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            up: false,
            status: ConnectionStatus::Unknown,
            counters: TrafficCounters {
                bytes_in: 0,
                bytes_out: 0,
                packets_in: 0,
                packets_out: 0,
            },
        }
    }
}

/// Status of one authenticated peer of a connection
///
/// The empty identity is reserved for the per-connection summary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatus {
    pub identity: String,
    pub up: bool,
    pub status: ConnectionStatus,
    #[serde(flatten)]
    pub counters: TrafficCounters,
}

impl UserStatus {
    /// Summary record (empty identity) mirroring a tunnel-level record
    #[must_use]
    pub fn summary(tunnel: &TunnelStatus) -> Self {
        Self {
            identity: String::new(),
            up: tunnel.up,
            status: tunnel.status,
            counters: tunnel.counters,
        }
    }

    #[must_use]
    pub fn is_summary(&self) -> bool {
        self.identity.is_empty()
    }
}

/// Fields of a peer session resolved so far
///
/// `None` means the field has not been seen yet. A session only turns into a
/// [`UserStatus`] once every field is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSession {
    pub identity: Option<String>,
    pub bytes_in: Option<u64>,
    pub bytes_out: Option<u64>,
    pub packets_in: Option<u64>,
    pub packets_out: Option<u64>,
}

impl PartialSession {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.identity.as_deref().is_some_and(|id| !id.is_empty())
            && self.bytes_in.is_some()
            && self.bytes_out.is_some()
            && self.packets_in.is_some()
            && self.packets_out.is_some()
    }

    /// Convert into a record, or `None` while any field is missing
    #[must_use]
    pub fn complete(self, status: ConnectionStatus) -> Option<UserStatus> {
        let identity = self.identity.filter(|id| !id.is_empty())?;
        Some(UserStatus {
            identity,
            up: true,
            status,
            counters: TrafficCounters {
                bytes_in: self.bytes_in?,
                bytes_out: self.bytes_out?,
                packets_in: self.packets_in?,
                packets_out: self.packets_out?,
            },
        })
    }
}
