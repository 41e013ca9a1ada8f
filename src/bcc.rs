//! Blind-carbon-copy detection.
//!
//! A blind recipient is an envelope recipient that no visible address
//! header mentions.

use crate::model::address::EmailAddress;
use crate::model::content::Content;
use crate::model::path::Path;

/// Headers whose addresses count as visible recipients.
const VISIBLE_RECIPIENT_HEADERS: [&str; 2] = ["To", "Cc"];

/// Envelope recipients not listed in `content`'s `To` or `Cc` headers,
/// in envelope order.
///
/// Header names and addresses are compared ASCII case-insensitively.
pub fn blind_recipients(recipients: &[Path], content: &Content) -> Vec<Path> {
    let visible: Vec<EmailAddress> = VISIBLE_RECIPIENT_HEADERS
        .iter()
        .filter_map(|name| content.header_ignore_case(name))
        .flat_map(EmailAddress::parse_list)
        .collect();

    recipients
        .iter()
        .filter(|path| !visible.iter().any(|addr| addr.matches(path)))
        .cloned()
        .collect()
}
