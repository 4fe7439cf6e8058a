//! Compiled pattern table for `ipsec statusall` output
//!
//! Every pattern is compiled once on first use and shared for the lifetime of
//! the process. None of them are anchored: the status tool's layout is
//! verbose and unstructured, so presence anywhere in the text is enough.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // Patterns are literals covered by tests
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("status pattern must compile")
}

/// IKE SA in the established state, e.g. `vpn1[5]: ESTABLISHED`
pub static ESTABLISHED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"[\[0-9]+\]: *ESTABLISHED"));

/// Child SA installed, e.g. `vpn1{5}:  INSTALLED`
pub static INSTALLED: LazyLock<Regex> = LazyLock::new(|| compile(r"\{[0-9]+\}: *INSTALLED"));

/// Reported when the named connection is not loaded
pub static NO_MATCH: LazyLock<Regex> = LazyLock::new(|| compile(r"no match"));

pub static BYTES_IN: LazyLock<Regex> = LazyLock::new(|| compile(r"([0-9]+) bytes_i"));

pub static BYTES_OUT: LazyLock<Regex> = LazyLock::new(|| compile(r"([0-9]+) bytes_o"));

pub static PACKETS_IN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"bytes_i \(([0-9]+) pkts"));

pub static PACKETS_OUT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"bytes_o \(([0-9]+) pkts"));

/// Bracketed peer id after the address pair, e.g. `1.2.3.4[me]...5.6.7.8[carol]`
pub static EAP_PEER_ID: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\]\.\.\.[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+\[([0-9a-zA-Z]+)\]")
});

pub static EAP_REMOTE_IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Remote EAP identity: ([0-9a-zA-Z]+)"));

pub static XAUTH_REMOTE_IDENTITY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"Remote XAuth identity: ([0-9a-zA-Z]+)"));

/// Token following the `===` traffic selector marker
pub static SA_NAME: LazyLock<Regex> = LazyLock::new(|| compile(r"=== ([0-9a-zA-Z\./]+)"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        for re in [
            &*ESTABLISHED,
            &*INSTALLED,
            &*NO_MATCH,
            &*BYTES_IN,
            &*BYTES_OUT,
            &*PACKETS_IN,
            &*PACKETS_OUT,
            &*EAP_PEER_ID,
            &*EAP_REMOTE_IDENTITY,
            &*XAUTH_REMOTE_IDENTITY,
            &*SA_NAME,
        ] {
            assert!(!re.as_str().is_empty());
        }
    }

    #[test]
    fn test_established_matches_index_marker() {
        assert!(ESTABLISHED.is_match("vpn1[12]: ESTABLISHED 3 minutes ago"));
        assert!(ESTABLISHED.is_match("vpn1[12]:ESTABLISHED"));
        assert!(!ESTABLISHED.is_match("vpn1{12}: ESTABLISHED"));
    }

    #[test]
    fn test_installed_matches_child_marker() {
        assert!(INSTALLED.is_match("vpn1{3}:  INSTALLED, TUNNEL, reqid 1"));
        assert!(!INSTALLED.is_match("vpn1[3]:  INSTALLED"));
    }

    #[test]
    fn test_counter_patterns_capture_digits() {
        let line = "AES_CBC_128/HMAC_SHA1_96, 1000 bytes_i (10 pkts, 3s ago), 2000 bytes_o (20 pkts, 3s ago)";
        assert_eq!(&BYTES_IN.captures(line).unwrap()[1], "1000");
        assert_eq!(&BYTES_OUT.captures(line).unwrap()[1], "2000");
        assert_eq!(&PACKETS_IN.captures(line).unwrap()[1], "10");
        assert_eq!(&PACKETS_OUT.captures(line).unwrap()[1], "20");
    }

    #[test]
    fn test_sa_name_accepts_subnets() {
        let line = "vpn1{1}:   10.0.0.0/24 === 10.1.0.0/16";
        assert_eq!(&SA_NAME.captures(line).unwrap()[1], "10.1.0.0/16");
    }
}
