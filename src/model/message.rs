//! Raw SMTP transactions and the parsed messages built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::content::{Content, MimeBody};
use super::message_id::MessageId;
use super::path::Path;

/// A transaction exactly as handed over by the SMTP session layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmtpMessage {
    /// Envelope sender (`MAIL FROM`). Empty for the null reverse-path.
    pub from: String,

    /// Envelope recipients (`RCPT TO`), in the order they were accepted.
    pub to: Vec<String>,

    /// The DATA payload: CRLF-terminated lines, headers, blank line, body.
    pub data: String,

    /// Identity the client gave in `HELO`/`EHLO`.
    pub helo: String,
}

/// A fully parsed message, ready to be stored or served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    #[serde(rename = "ID")]
    pub id: MessageId,

    /// Parsed envelope sender.
    pub from: Path,

    /// Parsed envelope recipients.
    pub to: Vec<Path>,

    /// Parsed DATA payload, including the synthesized
    /// `Message-ID`, `Received` and `Return-Path` headers.
    pub content: Content,

    /// When the message was captured.
    pub created: DateTime<Utc>,

    /// Same tree as `content.mime`. Kept for consumers that read it from here.
    #[serde(rename = "MIME")]
    pub mime: Option<MimeBody>,

    /// The unmodified transaction.
    pub raw: SmtpMessage,
}

impl Message {
    /// Envelope recipients that are not listed in the `To` or `Cc` headers.
    pub fn bcc(&self) -> Vec<Path> {
        crate::bcc::blind_recipients(&self.to, &self.content)
    }
}
