//! Message content: headers, body and the decomposed MIME tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Header name → values.
///
/// Only one value per name is kept: a repeated header overwrites the
/// earlier one. Multi-valued headers would need a new storage shape.
pub type Headers = BTreeMap<String, Vec<String>>;

/// A single message or MIME part.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Content {
    /// Parsed headers.
    pub headers: Headers,

    /// Raw body text after the blank line that ends the headers.
    pub body: String,

    /// Byte length of the text this content was parsed from
    /// (headers, separator and body together).
    pub size: usize,

    /// Child parts, present only for `multipart/*` content.
    #[serde(rename = "MIME")]
    pub mime: Option<MimeBody>,
}

/// The ordered parts of a multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MimeBody {
    pub parts: Vec<Content>,
}

impl Content {
    /// First value of the header `name` (exact, case-sensitive match).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value of the header `name`, matching the name case-insensitively.
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Replace every value of `name` with a single `value`.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_string(), vec![value.into()]);
    }

    /// Whether the `Content-Type` header declares a multipart body.
    pub fn is_mime(&self) -> bool {
        self.header("Content-Type")
            .is_some_and(|ct| ct.starts_with("multipart/"))
    }
}
