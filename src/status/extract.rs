//! Field extraction helpers
//!
//! Extraction never fails: a pattern that does not match, or a captured
//! number that does not fit, yields `None`.

use regex::Regex;

use super::patterns::{
    BYTES_IN, BYTES_OUT, EAP_PEER_ID, EAP_REMOTE_IDENTITY, PACKETS_IN, PACKETS_OUT, SA_NAME,
    XAUTH_REMOTE_IDENTITY,
};
use super::types::{AuthMode, TrafficCounters};

/// Integer fields reported per SA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterField {
    BytesIn,
    BytesOut,
    PacketsIn,
    PacketsOut,
}

impl CounterField {
    pub const ALL: [Self; 4] = [
        Self::BytesIn,
        Self::BytesOut,
        Self::PacketsIn,
        Self::PacketsOut,
    ];

    pub(crate) fn pattern(self) -> &'static Regex {
        match self {
            Self::BytesIn => &BYTES_IN,
            Self::BytesOut => &BYTES_OUT,
            Self::PacketsIn => &PACKETS_IN,
            Self::PacketsOut => &PACKETS_OUT,
        }
    }
}

/// Identity patterns for an auth mode, in fallback order
pub(crate) fn identity_patterns(auth: AuthMode) -> impl Iterator<Item = &'static Regex> {
    let (primary, fallback): (&'static Regex, Option<&'static Regex>) = match auth {
        AuthMode::Eap => (&*EAP_PEER_ID, Some(&*EAP_REMOTE_IDENTITY)),
        AuthMode::Xauth => (&*XAUTH_REMOTE_IDENTITY, None),
        AuthMode::CertificateOrPsk => (&*SA_NAME, None),
    };
    std::iter::once(primary).chain(fallback)
}

/// First capture group of the first match
fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extract a counter from the first match anywhere in `text`
#[must_use]
pub fn extract_counter(text: &str, field: CounterField) -> Option<u64> {
    first_capture(field.pattern(), text)?.parse().ok()
}

/// Extract the peer identity using the pattern(s) for `auth`
///
/// EAP first looks for the bracketed peer id and falls back to the remote
/// EAP identity.
#[must_use]
pub fn extract_identity(text: &str, auth: AuthMode) -> Option<&str> {
    identity_patterns(auth)
        .find_map(|re| first_capture(re, text))
        .filter(|id| !id.is_empty())
}

/// All four counters, with missing values resolved to zero
#[must_use]
pub fn extract_counters_or_zero(text: &str) -> TrafficCounters {
    let get = |field| extract_counter(text, field).unwrap_or(0);
    TrafficCounters {
        bytes_in: get(CounterField::BytesIn),
        bytes_out: get(CounterField::BytesOut),
        packets_in: get(CounterField::PacketsIn),
        packets_out: get(CounterField::PacketsOut),
    }
}
