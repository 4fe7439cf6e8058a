//! Connection discovery from strongSwan's `ipsec.conf`
//!
//! Only the parts needed to build a [`Connection`] are read: the `conn`
//! section names, `auto=ignore`, and the `*auth` parameters that decide
//! whether peers authenticate with EAP or XAuth.

use anyhow::Result;
use std::path::Path;

use crate::status::{AuthMode, Connection};
use crate::types::ConnectionName;

/// Parameters consulted when deciding the auth mode, in priority order
const AUTH_KEYS: &[&str] = &["rightauth", "rightauth2", "leftauth", "leftauth2"];

#[derive(Debug, Default)]
struct Section {
    name: Option<String>,
    auth: AuthMode,
    auth_priority: Option<usize>,
    ignored: bool,
}

impl Section {
    fn conn(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn apply(&mut self, key: &str, value: &str) {
        if key == "auto" {
            self.ignored = value == "ignore";
            return;
        }

        let Some(priority) = AUTH_KEYS.iter().position(|k| *k == key) else {
            return;
        };
        let Some(auth) = auth_mode(value) else {
            return;
        };
        if self.auth_priority.is_none_or(|current| priority < current) {
            self.auth = auth;
            self.auth_priority = Some(priority);
        }
    }

    fn into_connection(self) -> Option<Connection> {
        let name = self.name?;
        if name == "%default" {
            return None;
        }
        match ConnectionName::new(name) {
            Ok(name) => Some(Connection::new(name, self.auth).ignored(self.ignored)),
            Err(e) => {
                tracing::warn!("Skipping ipsec.conf section: {}", e);
                None
            }
        }
    }
}

fn auth_mode(value: &str) -> Option<AuthMode> {
    let value = value.to_ascii_lowercase();
    if value.contains("eap") {
        Some(AuthMode::Eap)
    } else if value.contains("xauth") {
        Some(AuthMode::Xauth)
    } else {
        None
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// Parse the `conn` sections of an `ipsec.conf` document
///
/// Sections appear in file order. `conn %default` and non-`conn` sections
/// (`config setup`, `ca ...`) are skipped.
#[must_use]
pub fn parse_ipsec_conf(content: &str) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut current: Option<Section> = None;

    for raw in content.lines() {
        let line = strip_comment(raw);
        if line.trim().is_empty() {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented {
            if let Some(section) = current.take() {
                connections.extend(section.into_connection());
            }
            let mut words = line.split_whitespace();
            current = match (words.next(), words.next()) {
                (Some("conn"), Some(name)) => Some(Section::conn(name)),
                _ => Some(Section::default()),
            };
            continue;
        }

        if let (Some(section), Some((key, value))) = (current.as_mut(), line.split_once('=')) {
            section.apply(key.trim(), value.trim().trim_matches('"'));
        }
    }

    if let Some(section) = current {
        connections.extend(section.into_connection());
    }

    connections
}

/// Read and parse an `ipsec.conf` file
pub fn load_ipsec_conf(path: &Path) -> Result<Vec<Connection>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read ipsec.conf '{}': {}", path.display(), e)
    })?;
    Ok(parse_ipsec_conf(&content))
}

/// Append discovered connections whose names are not already configured
///
/// Returns how many were added.
pub fn merge_connections(configured: &mut Vec<Connection>, discovered: Vec<Connection>) -> usize {
    let before = configured.len();
    for connection in discovered {
        if configured.iter().all(|c| c.name != connection.name) {
            configured.push(connection);
        }
    }
    configured.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# ipsec.conf - strongSwan IPsec configuration file

config setup
    charondebug="ike 1"
    uniqueids=no

conn %default
    keyexchange=ikev2
    rightauth=eap-mschapv2

conn site-a
    left=%defaultroute
    leftauth=psk
    right=198.51.100.7
    auto=start

conn roadwarrior
    leftauth=pubkey
    rightauth=eap-mschapv2   # windows clients
    rightsourceip=10.10.0.0/24
    auto=add

conn legacy-ios
    rightauth=pubkey
    rightauth2=xauth
    auto=add

conn retired
    auto=ignore
"#;

    fn names(connections: &[Connection]) -> Vec<&str> {
        connections.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_parse_sample() {
        let connections = parse_ipsec_conf(SAMPLE);

        assert_eq!(
            names(&connections),
            vec!["site-a", "roadwarrior", "legacy-ios", "retired"]
        );
        assert_eq!(connections[0].auth, AuthMode::CertificateOrPsk);
        assert_eq!(connections[1].auth, AuthMode::Eap);
        assert_eq!(connections[2].auth, AuthMode::Xauth);
        assert!(connections[3].ignored);
        assert!(!connections[0].ignored);
    }

    #[test]
    fn test_rightauth_takes_priority_over_leftauth() {
        let connections = parse_ipsec_conf(
            "conn mixed\n    leftauth=eap-tls\n    rightauth=xauth-psk\n",
        );
        assert_eq!(connections[0].auth, AuthMode::Xauth);
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_ipsec_conf("").is_empty());
        assert!(parse_ipsec_conf("# only a comment\n\n").is_empty());
    }

    #[test]
    fn test_quoted_values() {
        let connections = parse_ipsec_conf("conn q\n    rightauth=\"eap-md5\"\n");
        assert_eq!(connections[0].auth, AuthMode::Eap);
    }

    #[test]
    fn test_merge_keeps_configured_entries() {
        let mut configured = parse_ipsec_conf("conn roadwarrior\n    auto=ignore\n");
        let added = merge_connections(&mut configured, parse_ipsec_conf(SAMPLE));

        assert_eq!(added, 3);
        assert_eq!(configured.len(), 4);
        assert_eq!(configured[0].name.as_str(), "roadwarrior");
        assert!(configured[0].ignored);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_ipsec_conf(Path::new("/nonexistent/ipsec.conf")).unwrap_err();
        assert!(err.to_string().contains("Failed to read ipsec.conf"));
    }
}
