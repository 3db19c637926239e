use super::html::html_to_text;
use super::part::MimePart;
use super::whitespace::normalize_whitespace;

/// Body used when no part yields readable text.
pub const NO_CONTENT: &str = "No Content";

/// How many levels below a multipart payload's own children are searched.
///
/// Real-world messages nest `multipart/alternative` inside
/// `multipart/mixed` or `multipart/related`; one extra level covers them.
pub const MAX_NESTED_DESCENT: usize = 1;

const TEXT_PLAIN: &str = "text/plain";
const TEXT_HTML: &str = "text/html";

/// Pick and decode the most readable representation of a message.
///
/// Resolution, first success wins:
/// 1. a `text/plain` payload with a body
/// 2. a `text/html` payload with a body, converted to text
/// 3. for a multipart payload: the first plain child, else the first html
///    child, else the same search inside each nested multipart child, down
///    to [`MAX_NESTED_DESCENT`] extra levels
/// 4. [`NO_CONTENT`]
///
/// The result is whitespace-normalized.
pub fn extract_body(payload: &MimePart) -> String {
    let text = match payload {
        MimePart::Leaf { .. } => readable_leaf(payload, TEXT_PLAIN)
            .or_else(|| readable_leaf(payload, TEXT_HTML)),
        MimePart::Multipart { children, .. } => search_children(children, MAX_NESTED_DESCENT),
    };
    normalize_whitespace(text.as_deref().unwrap_or(NO_CONTENT))
}

fn search_children(children: &[MimePart], remaining_depth: usize) -> Option<String> {
    if let Some(text) = children.iter().find_map(|c| readable_leaf(c, TEXT_PLAIN)) {
        return Some(text);
    }
    if let Some(text) = children.iter().find_map(|c| readable_leaf(c, TEXT_HTML)) {
        return Some(text);
    }
    if remaining_depth == 0 {
        return None;
    }
    children.iter().find_map(|child| match child {
        MimePart::Multipart { children, .. } => search_children(children, remaining_depth - 1),
        MimePart::Leaf { .. } => None,
    })
}

/// Decoded text of a leaf of the given type; html is converted.
fn readable_leaf(part: &MimePart, media_type: &str) -> Option<String> {
    let MimePart::Leaf {
        body: Some(body), ..
    } = part
    else {
        return None;
    };
    if !part.is(media_type) {
        return None;
    }
    let decoded = body.decode()?;
    if media_type == TEXT_HTML {
        Some(html_to_text(&decoded))
    } else {
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::InlineBody;

    fn plain(text: &str) -> MimePart {
        MimePart::text("text/plain", text)
    }

    fn html(text: &str) -> MimePart {
        MimePart::text("text/html", text)
    }

    fn multipart(children: Vec<MimePart>) -> MimePart {
        MimePart::multipart("multipart/alternative", children)
    }

    #[test]
    fn plain_payload_decoded_directly() {
        assert_eq!(extract_body(&plain("Hello, World!")), "Hello, World!");
    }

    #[test]
    fn plain_payload_whitespace_cleaned() {
        assert_eq!(
            extract_body(&plain("Hello\n\n\n\nWorld   !")),
            "Hello\n\nWorld !"
        );
    }

    #[test]
    fn html_payload_converted() {
        let body = extract_body(&html("<p>Hi <b>there</b></p>"));
        assert_eq!(body, "Hi there");
    }

    #[test]
    fn plain_child_preferred_over_earlier_html_child() {
        let payload = multipart(vec![html("<p>markup</p>"), plain("plain text")]);
        assert_eq!(extract_body(&payload), "plain text");
    }

    #[test]
    fn html_only_child_has_no_tags_and_wraps() {
        let long = "word ".repeat(80);
        let payload = multipart(vec![html(&format!("<div><p>{long}</p><p>tail</p></div>"))]);
        let body = extract_body(&payload);
        assert!(!body.contains('<') && !body.contains('>'), "got {body:?}");
        for line in body.lines() {
            assert!(line.chars().count() <= 100, "line too long: {line:?}");
        }
        assert!(body.ends_with("tail"));
    }

    #[test]
    fn no_body_no_children_is_sentinel() {
        assert_eq!(extract_body(&MimePart::leaf("text/plain", None)), NO_CONTENT);
    }

    #[test]
    fn unsupported_leaf_type_is_sentinel() {
        let payload = MimePart::leaf("image/png", Some(InlineBody::from_text("binary")));
        assert_eq!(extract_body(&payload), NO_CONTENT);
    }

    #[test]
    fn nested_multipart_searched_one_level_down() {
        let payload = MimePart::multipart(
            "multipart/mixed",
            vec![
                MimePart::leaf("application/pdf", None),
                multipart(vec![html("<p>nested html</p>"), plain("nested plain")]),
            ],
        );
        assert_eq!(extract_body(&payload), "nested plain");
    }

    #[test]
    fn top_level_html_beats_nested_plain() {
        let payload = MimePart::multipart(
            "multipart/mixed",
            vec![multipart(vec![plain("nested plain")]), html("<p>top html</p>")],
        );
        assert_eq!(extract_body(&payload), "top html");
    }

    #[test]
    fn first_nested_match_wins() {
        let payload = MimePart::multipart(
            "multipart/mixed",
            vec![
                multipart(vec![html("<p>first</p>")]),
                multipart(vec![plain("second")]),
            ],
        );
        assert_eq!(extract_body(&payload), "first");
    }

    #[test]
    fn descent_stops_after_one_extra_level() {
        let payload = MimePart::multipart(
            "multipart/mixed",
            vec![MimePart::multipart(
                "multipart/related",
                vec![multipart(vec![plain("too deep")])],
            )],
        );
        assert_eq!(extract_body(&payload), NO_CONTENT);
    }

    #[test]
    fn undecodable_plain_falls_through_to_html() {
        let payload = multipart(vec![
            MimePart::leaf("text/plain", Some(InlineBody::new("%%%"))),
            html("<p>fallback</p>"),
        ]);
        assert_eq!(extract_body(&payload), "fallback");
    }

    #[test]
    fn plain_child_without_body_skipped() {
        let payload = multipart(vec![
            MimePart::leaf("text/plain", None),
            plain("second plain"),
        ]);
        assert_eq!(extract_body(&payload), "second plain");
    }

    #[test]
    fn whitespace_only_body_is_empty_not_sentinel() {
        assert_eq!(extract_body(&plain("   \n\n ")), "");
    }
}
