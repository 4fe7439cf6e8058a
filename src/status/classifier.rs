//! Connection-status classification

use super::patterns::{ESTABLISHED, INSTALLED, NO_MATCH};
use super::types::ConnectionStatus;

/// Classify raw status text into exactly one [`ConnectionStatus`]
///
/// First match wins:
/// 1. an established IKE SA, refined to `TunnelInstalled` when a child SA is
///    installed as well, otherwise `ConnectionEstablished`
/// 2. `no match` gives `Down`
/// 3. anything else is `Unknown`
///
/// `Ignored` is never produced here; it comes from configuration.
#[must_use]
pub fn classify(text: &str) -> ConnectionStatus {
    if ESTABLISHED.is_match(text) {
        if INSTALLED.is_match(text) {
            ConnectionStatus::TunnelInstalled
        } else {
            ConnectionStatus::ConnectionEstablished
        }
    } else if NO_MATCH.is_match(text) {
        ConnectionStatus::Down
    } else {
        ConnectionStatus::Unknown
    }
}
