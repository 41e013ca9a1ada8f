//! SMTP forward-path and reverse-path parsing (RFC 5321 §4.1.2).

use serde::{Deserialize, Serialize};

/// An SMTP forward-path or reverse-path, split into its components.
///
/// # Examples
/// - `"user@example.com"` → `mailbox = "user"`, `domain = "example.com"`
/// - `"@relay1,@relay2:user@example.com"` → `relays = ["@relay1", "@relay2"]`
/// - `""` (null reverse-path) → every field empty
///
/// Equality compares every field, with `relays` compared in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Path {
    /// Source-route relay hosts, in the order they were given.
    pub relays: Vec<String>,
    /// Local part of the address (may be empty).
    pub mailbox: String,
    /// Domain part of the address (may be empty).
    pub domain: String,
    /// ESMTP MAIL/RCPT parameters. Never populated by the parser.
    pub params: String,
}

impl Path {
    /// Parse a path string as received from the protocol layer.
    ///
    /// Never fails: the transaction was already accepted upstream, so
    /// anything unrecognised ends up in `mailbox` or is left empty.
    pub fn parse(raw: &str) -> Self {
        let (relays, email) = match raw.split_once(':') {
            Some((route, email)) => (route.split(',').map(String::from).collect(), email),
            None => (Vec::new(), raw),
        };

        let (mailbox, domain) = match email.split_once('@') {
            Some((mailbox, domain)) => (mailbox.to_string(), domain.to_string()),
            None => (email.to_string(), String::new()),
        };

        Self {
            relays,
            mailbox,
            domain,
            params: String::new(),
        }
    }

    /// The bare address: `mailbox@domain`, or just `mailbox` without a domain.
    pub fn address(&self) -> String {
        if self.domain.is_empty() {
            self.mailbox.clone()
        } else {
            format!("{}@{}", self.mailbox, self.domain)
        }
    }

    /// `true` for the null reverse-path (`MAIL FROM:<>`).
    pub fn is_null(&self) -> bool {
        self.relays.is_empty() && self.mailbox.is_empty() && self.domain.is_empty()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.relays.is_empty() {
            write!(f, "{}:", self.relays.join(","))?;
        }
        write!(f, "{}", self.address())
    }
}
