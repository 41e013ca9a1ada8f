//! MIME multipart handling: boundary extraction and recursive part decomposition.

use tracing::{debug, warn};

use crate::model::content::{Content, MimeBody};
use crate::parser::header::parse_content;

/// Default limit on nested multipart levels that get decomposed.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Extract the `boundary` parameter from a `Content-Type` value.
///
/// Handles both the quoted (`boundary="abc"`) and bare (`boundary=abc`)
/// forms. A bare boundary ends at `;`, space, CR or LF. Returns `None`
/// when there is no parameter, nothing after `boundary=`, or an
/// unterminated quote. The boundary's characters are not validated.
pub fn extract_boundary(content_type: &str) -> Option<&str> {
    const KEY: &str = "boundary=";

    let start = content_type.find(KEY)? + KEY.len();
    let rest = &content_type[start..];

    let boundary = match rest.strip_prefix('"') {
        Some(quoted) => &quoted[..quoted.find('"')?],
        None => match rest.find([';', ' ', '\r', '\n']) {
            Some(end) => &rest[..end],
            None => rest,
        },
    };

    (!boundary.is_empty()).then_some(boundary)
}

/// Split a multipart [`Content`] into its parts.
///
/// The body is cut on `--<boundary>`; every non-empty fragment (preamble
/// and closing `--` included) is stripped of surrounding CR/LF and parsed
/// as a part. Parts that are multipart themselves are decomposed too, up
/// to `max_depth` levels counting this one. A missing boundary gives an
/// empty [`MimeBody`].
pub fn parse_mime_body(content: &Content, max_depth: usize) -> MimeBody {
    decompose(content, 1, max_depth.max(1))
}

fn decompose(content: &Content, depth: usize, max_depth: usize) -> MimeBody {
    let Some(content_type) = content.header("Content-Type") else {
        return MimeBody::default();
    };

    let Some(boundary) = extract_boundary(content_type) else {
        debug!(content_type, "Boundary not found");
        return MimeBody::default();
    };
    debug!(boundary, depth, "Splitting multipart body");

    let delimiter = format!("--{boundary}");
    let parts = content
        .body
        .split(delimiter.as_str())
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| {
            let mut part = parse_content(fragment.trim_matches(['\r', '\n']));
            if part.is_mime() {
                if depth < max_depth {
                    part.mime = Some(decompose(&part, depth + 1, max_depth));
                } else {
                    warn!(
                        depth,
                        max_depth, "MIME nesting limit reached, leaving part undecomposed"
                    );
                }
            }
            part
        })
        .collect();

    MimeBody { parts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multipart(content_type: &str, body: &str) -> Content {
        let mut content = Content::default();
        content.set_header("Content-Type", content_type);
        content.body = body.to_string();
        content.size = body.len();
        content
    }

    /// Nest `levels` multipart/mixed containers around a text part.
    fn nested(levels: usize) -> String {
        let mut inner = "Content-Type: text/plain\r\n\r\ncore".to_string();
        for level in 0..levels {
            inner = format!(
                "Content-Type: multipart/mixed; boundary=b{level}\r\n\r\n--b{level}\r\n{inner}\r\n--b{level}--"
            );
        }
        inner
    }

    #[test]
    fn test_extract_quoted_boundary() {
        assert_eq!(
            extract_boundary(r#"multipart/alternative; boundary="_----------=_MCPart_498914860""#),
            Some("_----------=_MCPart_498914860")
        );
    }

    #[test]
    fn test_extract_bare_boundary() {
        assert_eq!(
            extract_boundary("multipart/alternative; boundary=047d7bd74a2049b624050d805118"),
            Some("047d7bd74a2049b624050d805118")
        );
    }

    #[test]
    fn test_extract_bare_boundary_terminators() {
        assert_eq!(
            extract_boundary("multipart/mixed; boundary=abc; charset=utf-8"),
            Some("abc")
        );
        assert_eq!(extract_boundary("multipart/mixed; boundary=abc def"), Some("abc"));
        assert_eq!(extract_boundary("multipart/mixed; boundary=abc\r\n x=y"), Some("abc"));
        assert_eq!(extract_boundary("multipart/mixed; boundary=abc\nx"), Some("abc"));
    }

    #[test]
    fn test_extract_quoted_boundary_may_contain_terminators() {
        assert_eq!(
            extract_boundary(r#"multipart/mixed; boundary="a b;c"; x=y"#),
            Some("a b;c")
        );
    }

    #[test]
    fn test_extract_missing_boundary() {
        assert_eq!(extract_boundary("multipart/mixed"), None);
        assert_eq!(extract_boundary("multipart/mixed; boundary="), None);
        assert_eq!(extract_boundary(r#"multipart/mixed; boundary="open"#), None);
        assert_eq!(extract_boundary(r#"multipart/mixed; boundary="""#), None);
    }

    #[test]
    fn test_decompose_parts_in_order() {
        let body = "This is the preamble.\r\n\
                    --XYZ\r\n\
                    Content-Type: text/plain\r\n\r\nplain text\r\n\
                    --XYZ\r\n\
                    Content-Type: text/html\r\n\r\n<p>html</p>\r\n\
                    --XYZ--\r\n";
        let mime = parse_mime_body(&multipart("multipart/alternative; boundary=XYZ", body), 10);

        assert_eq!(mime.parts.len(), 4);
        assert_eq!(mime.parts[0].body, "This is the preamble.");
        assert!(mime.parts[0].headers.is_empty());
        assert_eq!(mime.parts[1].header("Content-Type"), Some("text/plain"));
        assert_eq!(mime.parts[1].body, "plain text");
        assert_eq!(mime.parts[2].header("Content-Type"), Some("text/html"));
        assert_eq!(mime.parts[2].body, "<p>html</p>");
        // The closing delimiter leaves a "--" fragment behind.
        assert_eq!(mime.parts[3].body, "--");
    }

    #[test]
    fn test_part_size_is_trimmed_fragment_length() {
        let part_text = "Content-Type: text/plain\r\n\r\nhello";
        let body = format!("--B\r\n{part_text}\r\n--B--");
        let mime = parse_mime_body(&multipart("multipart/mixed; boundary=B", &body), 10);
        assert_eq!(mime.parts[0].size, part_text.len());
    }

    #[test]
    fn test_missing_boundary_gives_no_parts() {
        let mime = parse_mime_body(&multipart("multipart/mixed", "--x\r\nA: b\r\n\r\nc"), 10);
        assert!(mime.parts.is_empty());
    }

    #[test]
    fn test_rejoin_round_trip() {
        let bodies = ["first part", "second\r\nwith lines", "third"];
        let body = bodies
            .iter()
            .map(|b| format!("\r\nContent-Type: text/plain\r\n\r\n{b}\r\n"))
            .collect::<Vec<_>>()
            .join("--R");
        let content = multipart("multipart/mixed; boundary=R", &body);
        let first = parse_mime_body(&content, 10);
        let got: Vec<_> = first.parts.iter().map(|p| p.body.as_str()).collect();
        assert_eq!(got, bodies);

        let rejoined = first
            .parts
            .iter()
            .map(|p| format!("\r\nContent-Type: text/plain\r\n\r\n{}\r\n", p.body))
            .collect::<Vec<_>>()
            .join("--R");
        let second = parse_mime_body(&multipart("multipart/mixed; boundary=R", &rejoined), 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_nested_multipart_is_decomposed() {
        let body = "--outer\r\n\
                    Content-Type: multipart/alternative; boundary=\"inner\"\r\n\r\n\
                    --inner\r\nContent-Type: text/plain\r\n\r\ntext\r\n\
                    --inner\r\nContent-Type: text/html\r\n\r\n<b>html</b>\r\n\
                    --inner--\r\n\
                    --outer\r\n\
                    Content-Type: application/pdf\r\n\r\nJVBERi0=\r\n\
                    --outer--\r\n";
        let mime = parse_mime_body(&multipart("multipart/mixed; boundary=outer", body), 10);

        assert_eq!(mime.parts.len(), 3);
        let inner = mime.parts[0].mime.as_ref().expect("nested MIME body");
        assert_eq!(inner.parts[0].body, "text");
        assert_eq!(inner.parts[1].body, "<b>html</b>");
        assert_eq!(mime.parts[1].header("Content-Type"), Some("application/pdf"));
        assert!(mime.parts[1].mime.is_none());
    }

    #[test]
    fn test_depth_limit_leaves_deep_parts_raw() {
        let content = crate::parser::header::parse_content(&nested(4));

        let full = parse_mime_body(&content, 10);
        let mut level = &full;
        for _ in 0..3 {
            level = level.parts[0].mime.as_ref().expect("decomposed level");
        }
        assert_eq!(level.parts[0].body, "core");

        let limited = parse_mime_body(&content, 2);
        let second = limited.parts[0].mime.as_ref().expect("second level");
        assert!(second.parts[0].is_mime());
        assert!(second.parts[0].mime.is_none());
        assert!(second.parts[0].body.contains("--b1"));
    }

    #[test]
    fn test_zero_depth_still_decomposes_top_level() {
        let content = crate::parser::header::parse_content(&nested(2));
        let mime = parse_mime_body(&content, 0);
        assert!(!mime.parts.is_empty());
        assert!(mime.parts[0].mime.is_none());
    }
}
