//! The MIME-part tree handed to the extractor.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};

/// Encoded content of a leaf part, as delivered by the mailbox (base64url).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineBody(String);

impl InlineBody {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode raw text, for building trees by hand.
    pub fn from_text(text: &str) -> Self {
        Self(URL_SAFE_NO_PAD.encode(text.as_bytes()))
    }

    /// Decode to UTF-8 text, replacing invalid sequences.
    ///
    /// Padding varies between providers and some send the standard
    /// alphabet, so each engine is tried in turn.
    pub fn decode(&self) -> Option<String> {
        let data = self.0.trim();
        [&URL_SAFE_NO_PAD, &URL_SAFE, &STANDARD, &STANDARD_NO_PAD]
            .into_iter()
            .find_map(|engine| engine.decode(data).ok())
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A node in a message's MIME structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimePart {
    /// A content-bearing part. `body` is `None` for parts whose data lives
    /// elsewhere (attachments) or that are empty.
    Leaf {
        media_type: String,
        body: Option<InlineBody>,
    },
    /// A container with at least one child.
    Multipart {
        media_type: String,
        children: Vec<MimePart>,
    },
}

impl MimePart {
    pub fn leaf(media_type: impl Into<String>, body: Option<InlineBody>) -> Self {
        MimePart::Leaf {
            media_type: media_type.into(),
            body,
        }
    }

    /// Shorthand for a leaf carrying `text`.
    pub fn text(media_type: impl Into<String>, text: &str) -> Self {
        Self::leaf(media_type, Some(InlineBody::from_text(text)))
    }

    /// Build a container; an empty child list degrades to a body-less leaf.
    pub fn multipart(media_type: impl Into<String>, children: Vec<MimePart>) -> Self {
        if children.is_empty() {
            return Self::leaf(media_type, None);
        }
        MimePart::Multipart {
            media_type: media_type.into(),
            children,
        }
    }

    pub fn media_type(&self) -> &str {
        match self {
            MimePart::Leaf { media_type, .. } | MimePart::Multipart { media_type, .. } => {
                media_type
            }
        }
    }

    /// Whether the media type's essence equals `expected` (case-insensitive,
    /// parameters ignored).
    pub fn is(&self, expected: &str) -> bool {
        let essence = self.media_type().split(';').next().unwrap_or_default();
        essence.trim().eq_ignore_ascii_case(expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_url_safe_unpadded() {
        // "Hello, World!" in base64url
        let body = InlineBody::new("SGVsbG8sIFdvcmxkIQ");
        assert_eq!(body.decode().as_deref(), Some("Hello, World!"));
    }

    #[test]
    fn decode_url_safe_alphabet() {
        // "??>" encodes to "Pz8-" in base64url and "Pz8+" in standard
        assert_eq!(InlineBody::new("Pz8-").decode().as_deref(), Some("??>"));
        assert_eq!(InlineBody::new("Pz8+").decode().as_deref(), Some("??>"));
    }

    #[test]
    fn decode_garbage_is_none() {
        assert_eq!(InlineBody::new("!!not base64!!").decode(), None);
    }

    #[test]
    fn decode_invalid_utf8_is_lossy() {
        let body = InlineBody::new(URL_SAFE_NO_PAD.encode([b'h', b'i', 0xff]));
        assert_eq!(body.decode().as_deref(), Some("hi\u{fffd}"));
    }

    #[test]
    fn from_text_roundtrips_unicode() {
        let body = InlineBody::from_text("Grüße 👋");
        assert_eq!(body.decode().as_deref(), Some("Grüße 👋"));
    }

    #[test]
    fn media_type_match_ignores_case_and_params() {
        let part = MimePart::text("Text/Plain; charset=\"UTF-8\"", "x");
        assert!(part.is("text/plain"));
        assert!(!part.is("text/html"));
    }

    #[test]
    fn empty_multipart_becomes_leaf() {
        let part = MimePart::multipart("multipart/mixed", vec![]);
        assert_eq!(part, MimePart::leaf("multipart/mixed", None));
    }
}
