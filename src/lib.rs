//! `smtpcap`: the parsing core of a mail-capture tool.
//!
//! Turns a raw SMTP transaction (envelope sender and recipients, HELO
//! identity, DATA payload) into a structured [`Message`]: parsed headers,
//! body, recursively decomposed MIME parts, parsed envelope paths and a
//! freshly assigned message id.
//!
//! ```
//! use smtpcap::SmtpMessage;
//!
//! let raw = SmtpMessage {
//!     from: "a@b.com".into(),
//!     to: vec!["c@d.com".into()],
//!     data: "Subject: hi\r\n\r\nhello\r\n".into(),
//!     helo: "client".into(),
//! };
//! let msg = raw.parse("host");
//! assert_eq!(msg.from.mailbox, "a");
//! assert_eq!(msg.content.header("Return-Path"), Some("<a@b.com>"));
//! ```

pub mod bcc;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;

pub use model::content::{Content, Headers, MimeBody};
pub use model::message::{Message, SmtpMessage};
pub use model::message_id::MessageId;
pub use model::path::Path;
pub use parser::smtp::MessageParser;
