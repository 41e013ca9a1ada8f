//! Header/body splitting with RFC 5322 header folding.

use tracing::debug;

use crate::model::content::{Content, Headers};

/// Separator between the header block and the body.
const HEADER_BODY_SEPARATOR: &str = "\r\n\r\n";

/// Split raw text into headers and body.
///
/// The header block ends at the first blank line. Without one, the whole
/// input is body. `size` always records the full input length.
pub fn parse_content(data: &str) -> Content {
    match data.split_once(HEADER_BODY_SEPARATOR) {
        Some((header_block, body)) => Content {
            headers: parse_header_block(header_block),
            body: body.to_string(),
            size: data.len(),
            mime: None,
        },
        None => Content {
            headers: Headers::new(),
            body: data.to_string(),
            size: data.len(),
            mime: None,
        },
    }
}

/// Parse CRLF-separated header lines, folding continuation lines into the
/// header they continue.
///
/// A continuation is appended to the current value as-is. When the value
/// was empty (`Name:` with the content on the next line) the folding
/// whitespace is dropped instead of becoming the start of the value.
fn parse_header_block(block: &str) -> Headers {
    let mut headers = Headers::new();
    let mut last_name: Option<String> = None;

    for line in block.split("\r\n") {
        let is_continuation = line.starts_with(' ') || line.starts_with('\t');
        if let (true, Some(name)) = (is_continuation, &last_name) {
            if let Some(value) = headers.get_mut(name).and_then(|values| values.last_mut()) {
                if value.is_empty() {
                    value.push_str(line.trim_start_matches([' ', '\t']));
                } else {
                    value.push_str(line);
                }
                continue;
            }
        }

        match split_header_line(line) {
            Some((name, value)) => {
                headers.insert(name.to_string(), vec![value.to_string()]);
                last_name = Some(name.to_string());
            }
            None => debug!(line, "Dropping invalid header line"),
        }
    }

    headers
}

/// Split `Name: Value` into its parts. The name must be non-empty.
///
/// Only the single space of the `": "` separator is removed; any further
/// leading whitespace belongs to the value.
fn split_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "f71324948a11ad59c9f52aa27a1f194391968da6b7623186fedd0d190fd2f484";

    #[test]
    fn test_folded_header_onto_empty_value() {
        let input = format!("To: foo@bar.com\r\nX-Foo-Digest:\r\n {DIGEST}\r\n\r\nbody\r\n");
        let content = parse_content(&input);

        let mut expected = Headers::new();
        expected.insert("To".into(), vec!["foo@bar.com".into()]);
        expected.insert("X-Foo-Digest".into(), vec![DIGEST.into()]);

        assert_eq!(content.headers, expected);
        assert_eq!(content.body, "body\r\n");
        assert_eq!(content.size, 107);
        assert_eq!(content.size, input.len());
        assert!(content.mime.is_none());
    }

    #[test]
    fn test_folded_header_keeps_raw_whitespace() {
        let content =
            parse_content("Subject: a long\r\n  subject\r\n\tline\r\nTo: x@y.z\r\n\r\n");
        assert_eq!(content.headers["Subject"], vec!["a long  subject\tline"]);
        assert_eq!(content.headers["To"], vec!["x@y.z"]);
    }

    #[test]
    fn test_value_keeps_whitespace_beyond_separator() {
        let content =
            parse_content("Subject:  two spaces\r\nX-Tab: \tindented\r\nX-Tight:tight\r\n\r\n");
        assert_eq!(content.headers["Subject"], vec![" two spaces"]);
        assert_eq!(content.headers["X-Tab"], vec!["\tindented"]);
        assert_eq!(content.headers["X-Tight"], vec!["tight"]);
    }

    #[test]
    fn test_continuation_after_dropped_line_folds_onto_last_header() {
        let content = parse_content("Subject: one\r\nnot a header\r\n two\r\n\r\n");
        assert_eq!(content.headers["Subject"], vec!["one two"]);
    }

    #[test]
    fn test_no_separator_means_all_body() {
        let input = "Subject: hi\r\nno blank line here";
        let content = parse_content(input);
        assert!(content.headers.is_empty());
        assert_eq!(content.body, input);
        assert_eq!(content.size, input.len());
    }

    #[test]
    fn test_body_keeps_later_blank_lines() {
        let content = parse_content("A: 1\r\n\r\npara one\r\n\r\npara two");
        assert_eq!(content.body, "para one\r\n\r\npara two");
    }

    #[test]
    fn test_invalid_lines_are_dropped() {
        let content = parse_content("garbage line\r\n: no name\r\nSubject: ok\r\n\r\n");
        assert_eq!(content.headers.len(), 1);
        assert_eq!(content.headers["Subject"], vec!["ok"]);
    }

    #[test]
    fn test_leading_continuation_is_dropped() {
        let content = parse_content(" orphan\r\nSubject: ok\r\n\r\nbody");
        assert_eq!(content.headers.len(), 1);
        assert_eq!(content.headers["Subject"], vec!["ok"]);
    }

    #[test]
    fn test_duplicate_header_overwrites() {
        let content = parse_content("Received: first\r\nReceived: second\r\n\r\n");
        assert_eq!(content.headers["Received"], vec!["second"]);
    }

    #[test]
    fn test_value_may_contain_colons() {
        let content = parse_content("Date: Mon, 01 Jan 2024 10:00:00 +0000\r\n\r\n");
        assert_eq!(
            content.headers["Date"],
            vec!["Mon, 01 Jan 2024 10:00:00 +0000"]
        );
    }

    #[test]
    fn test_size_counts_bytes_not_chars() {
        let input = "Subject: café\r\n\r\nñ";
        assert_eq!(parse_content(input).size, input.len());
    }

    #[test]
    fn test_empty_input() {
        let content = parse_content("");
        assert!(content.headers.is_empty());
        assert_eq!(content.body, "");
        assert_eq!(content.size, 0);
    }
}
