//! Address lists from `To`/`Cc` header values (RFC 5322 §3.4).
//!
//! These are header-level addresses, unrelated to the envelope [`Path`]s
//! except when working out blind recipients.

use serde::{Deserialize, Serialize};

use super::path::Path;

/// One address taken from an address header.
///
/// - `"Jane Doe <jane@example.com>"` → `display_name = "Jane Doe"`, `address = "jane@example.com"`
/// - `"jane@example.com"` → `display_name = ""`, `address = "jane@example.com"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub display_name: String,
    pub address: String,
}

impl EmailAddress {
    /// Parse a single mailbox. Unrecognised input is kept verbatim as `address`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let (Some(open), Some(close)) = (trimmed.rfind('<'), trimmed.rfind('>')) {
            if close > open {
                return Self {
                    display_name: strip_quotes(&trimmed[..open]),
                    address: trimmed[open + 1..close].trim().to_string(),
                };
            }
        }

        Self {
            display_name: String::new(),
            address: trimmed.to_string(),
        }
    }

    /// Parse a comma-separated address list.
    ///
    /// Commas inside quotes or angle brackets do not split. Group syntax
    /// (`Team: a@b.com, c@d.com;`) contributes its members, so
    /// `undisclosed-recipients:;` yields nothing.
    pub fn parse_list(raw: &str) -> Vec<Self> {
        let mut results = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;
        let mut in_angle = false;

        for ch in raw.chars() {
            match ch {
                '"' => {
                    in_quotes = !in_quotes;
                    current.push(ch);
                }
                '<' if !in_quotes => {
                    in_angle = true;
                    current.push(ch);
                }
                '>' if !in_quotes => {
                    in_angle = false;
                    current.push(ch);
                }
                // Group label: drop it and keep collecting members.
                ':' if !in_quotes && !in_angle => current.clear(),
                ',' | ';' if !in_quotes && !in_angle => {
                    push_parsed(&mut results, &current);
                    current.clear();
                }
                _ => current.push(ch),
            }
        }
        push_parsed(&mut results, &current);

        results
    }

    /// Whether this header address names the same mailbox as an envelope path.
    pub fn matches(&self, path: &Path) -> bool {
        self.address.eq_ignore_ascii_case(&path.address())
    }
}

fn push_parsed(results: &mut Vec<EmailAddress>, segment: &str) {
    let addr = EmailAddress::parse(segment);
    if !addr.address.is_empty() {
        results.push(addr);
    }
}

fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.display_name, self.address)
        }
    }
}
