//! Parsing of `ipsec statusall` output into a status model
//!
//! This is the decision-making core of the exporter. Given the raw text for
//! one connection it classifies the connection state, extracts traffic
//! counters and splits the text into per-peer sessions. Nothing here
//! performs I/O except the async `query_*` wrappers, which delegate to a
//! [`StatusSource`](crate::source::StatusSource).

mod classifier;
mod extract;
mod patterns;
mod query;
mod segmenter;
mod types;

pub use classifier::classify;
pub use extract::{CounterField, extract_counter, extract_counters_or_zero, extract_identity};
pub use query::{
    UserStatusMap, query_tunnel_status, query_user_status, tunnel_status, user_statuses,
};
pub(crate) use query::users_for_tunnel;
pub use segmenter::{Segmenter, segment_sessions};
pub use types::{
    AuthMode, Connection, ConnectionStatus, PartialSession, TrafficCounters, TunnelStatus,
    UserStatus,
};
