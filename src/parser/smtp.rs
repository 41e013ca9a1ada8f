//! Assembly of a parsed [`Message`] from a raw SMTP transaction.

use chrono::{DateTime, Local, TimeZone, Utc};
use rand::RngCore;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::model::content::Content;
use crate::model::message::{Message, SmtpMessage};
use crate::model::message_id::MessageId;
use crate::model::path::Path;
use crate::parser::{header, mime};

/// Continuation that starts the second line of the `Received` header.
const RECEIVED_FOLD: &str = "\r\n          id ";

/// Turns raw transactions into parsed messages for one capturing host.
///
/// Holds no mutable state, so one parser can be shared between threads.
#[derive(Debug, Clone)]
pub struct MessageParser {
    hostname: String,
    product_id: String,
    max_mime_depth: usize,
}

impl MessageParser {
    /// Parser for `hostname` with default settings.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self::with_config(hostname, &ParserConfig::default())
    }

    /// Parser for `hostname` using the product id and depth limit from `config`.
    pub fn with_config(hostname: impl Into<String>, config: &ParserConfig) -> Self {
        Self {
            hostname: hostname.into(),
            product_id: config.product_id.clone(),
            max_mime_depth: config.max_mime_depth,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Parse a transaction, drawing the message id from the OS random source.
    pub fn parse(&self, raw: &SmtpMessage) -> Message {
        self.parse_with_rng(raw, &mut rand::rngs::OsRng)
    }

    /// Parse a transaction, drawing the message id from `rng`.
    ///
    /// If `rng` fails the message gets an empty id; parsing carries on.
    pub fn parse_with_rng<R: RngCore + ?Sized>(&self, raw: &SmtpMessage, rng: &mut R) -> Message {
        let to: Vec<Path> = raw.to.iter().map(|r| Path::parse(r)).collect();
        let from = Path::parse(&raw.from);

        let id = MessageId::generate(&self.hostname, rng).unwrap_or_else(|e| {
            warn!(error = %e, "Could not generate message id, continuing without one");
            MessageId::default()
        });

        let mut content = header::parse_content(&raw.data);
        if content.is_mime() {
            debug!(id = %id, "Parsing MIME body");
            content.mime = Some(mime::parse_mime_body(&content, self.max_mime_depth));
        }

        let now = Local::now();
        self.inject_headers(&mut content, raw, &id, &now);

        Message {
            mime: content.mime.clone(),
            id,
            from,
            to,
            content,
            created: now.with_timezone(&Utc),
            raw: raw.clone(),
        }
    }

    /// Overwrite `Message-ID`, `Received` and `Return-Path` on the top-level content.
    fn inject_headers<Tz: TimeZone>(
        &self,
        content: &mut Content,
        raw: &SmtpMessage,
        id: &MessageId,
        at: &DateTime<Tz>,
    ) where
        Tz::Offset: std::fmt::Display,
    {
        content.set_header("Message-ID", id.as_str());
        content.set_header("Received", self.received_header(&raw.helo, id, at));
        content.set_header("Return-Path", format!("<{}>", raw.from));
    }

    /// `from <helo> by <host> (<product>)` folded onto `id <id>; <date>`.
    ///
    /// The date uses the RFC 1123 layout with a numeric zone.
    fn received_header<Tz: TimeZone>(&self, helo: &str, id: &MessageId, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "from {helo} by {} ({}){RECEIVED_FOLD}{id}; {}",
            self.hostname,
            self.product_id,
            at.format("%a, %d %b %Y %H:%M:%S %z")
        )
    }
}

impl SmtpMessage {
    /// Parse this transaction as captured by `hostname`, with default settings.
    pub fn parse(&self, hostname: &str) -> Message {
        MessageParser::new(hostname).parse(self)
    }
}
