//! Message parsing: header blocks, MIME decomposition and transaction assembly.

pub mod header;
pub mod mime;
pub mod smtp;

use std::borrow::Cow;

/// Convert bare `\n` line endings to `\r\n`, leaving existing `\r\n` alone.
///
/// The parser works on SMTP's CRLF line endings; `.eml` files saved on
/// Unix usually have plain LF.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    let bare_lf = text
        .bytes()
        .enumerate()
        .any(|(i, b)| b == b'\n' && (i == 0 || text.as_bytes()[i - 1] != b'\r'));
    if !bare_lf {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + text.len() / 32);
    let mut prev = '\0';
    for ch in text.chars() {
        if ch == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(ch);
        prev = ch;
    }
    Cow::Owned(out)
}
