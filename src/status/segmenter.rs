//! Per-peer session segmentation
//!
//! One status dump can describe several peers of the same connection, one
//! section after another, with no delimiter that holds across auth modes.
//! Sessions are carved out by growing a segment from the current start
//! until the identity and all four counters resolve inside it. The session
//! is emitted and the next segment starts where it ended.
//!
//! The completion point of a segment is the earliest offset at which every
//! field has a match. Instead of re-testing every prefix of the segment, the
//! earliest match end of each field is located inside its leftmost match and
//! the segment completes at the largest of those offsets. Values are then
//! read from the segment ending there, so a greedy token that runs past the
//! completion point is cut exactly where a prefix scan would have cut it.

use regex::Regex;

use super::classifier::classify;
use super::extract::{CounterField, extract_counter, extract_identity, identity_patterns};
use super::types::{AuthMode, ConnectionStatus, PartialSession, UserStatus};

/// Split `text` into per-peer records, in order of appearance
///
/// Every record carries the classification of the whole text. A trailing
/// session that never resolves completely is dropped.
#[must_use]
pub fn segment_sessions(text: &str, auth: AuthMode) -> Vec<UserStatus> {
    Segmenter::new(text, auth).collect()
}

/// Iterator over complete peer sessions in a status dump
#[derive(Debug, Clone)]
pub struct Segmenter<'t> {
    text: &'t str,
    auth: AuthMode,
    status: ConnectionStatus,
    start: usize,
}

impl<'t> Segmenter<'t> {
    #[must_use]
    pub fn new(text: &'t str, auth: AuthMode) -> Self {
        Self {
            text,
            auth,
            status: classify(text),
            start: 0,
        }
    }

    /// Offset (relative to `segment`) at which all five fields first resolve
    fn completion_offset(&self, segment: &str) -> Option<usize> {
        let identity_end = identity_patterns(self.auth)
            .filter_map(|re| earliest_match_end(re, segment))
            .min()?;

        CounterField::ALL
            .iter()
            .try_fold(identity_end, |end, field| {
                Some(end.max(earliest_match_end(field.pattern(), segment)?))
            })
    }

    fn resolve(&self, segment: &str) -> PartialSession {
        PartialSession {
            identity: extract_identity(segment, self.auth).map(str::to_string),
            bytes_in: extract_counter(segment, CounterField::BytesIn),
            bytes_out: extract_counter(segment, CounterField::BytesOut),
            packets_in: extract_counter(segment, CounterField::PacketsIn),
            packets_out: extract_counter(segment, CounterField::PacketsOut),
        }
    }
}

/// Smallest `end` such that `re` matches somewhere in `haystack[..end]`
///
/// No match can start before the leftmost one, so the earliest-ending match
/// lies inside the leftmost match's span. Only that window is re-tested.
fn earliest_match_end(re: &Regex, haystack: &str) -> Option<usize> {
    let leftmost = re.find(haystack)?;
    let window = leftmost.as_str();
    window
        .char_indices()
        .map(|(i, ch)| i + ch.len_utf8())
        .find(|&len| re.is_match(&window[..len]))
        .map(|len| leftmost.start() + len)
}

impl Iterator for Segmenter<'_> {
    type Item = UserStatus;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.start..).filter(|rest| !rest.is_empty())?;
        let end = self.completion_offset(rest)?;
        let session = self.resolve(&rest[..end]);

        // A counter that matched but did not parse stays the first match
        // for every longer segment, so nothing after it can complete.
        let Some(record) = session.complete(self.status) else {
            self.start = self.text.len();
            return None;
        };

        self.start += end;
        Some(record)
    }
}
