//! Gmail API response normalization
//!
//! Converts Gmail API responses to mailbox types.

use chrono::{DateTime, Utc};

use super::api::{GmailMessage, MessagePart, TokenInfoResponse};
use crate::body::{InlineBody, MimePart};
use crate::mailbox::{FetchedMessage, Header, TokenInfo};

/// Normalize a Gmail API message
pub fn normalize_message(gmail_msg: GmailMessage) -> FetchedMessage {
    let internal_date_ms = gmail_msg
        .internal_date
        .as_deref()
        .and_then(|d| d.trim().parse::<i64>().ok());

    let (headers, payload) = match gmail_msg.payload {
        Some(mut payload) => {
            let headers = payload
                .headers
                .take()
                .unwrap_or_default()
                .into_iter()
                .map(|h| Header::new(h.name, h.value))
                .collect();
            (headers, normalize_part(payload))
        }
        None => (Vec::new(), MimePart::leaf("", None)),
    };

    FetchedMessage {
        id: gmail_msg.id,
        headers,
        payload,
        internal_date_ms,
    }
}

/// Convert a part to the tagged tree; non-empty `parts` makes a multipart
pub fn normalize_part(part: MessagePart) -> MimePart {
    let media_type = part.mime_type.unwrap_or_default();
    match part.parts {
        Some(children) if !children.is_empty() => MimePart::multipart(
            media_type,
            children.into_iter().map(normalize_part).collect(),
        ),
        _ => {
            let body = part
                .body
                .and_then(|b| b.data)
                .filter(|d| !d.is_empty())
                .map(InlineBody::new);
            MimePart::leaf(media_type, body)
        }
    }
}

/// Convert a tokeninfo response; `exp` wins over `expires_in`
pub fn normalize_token_info(raw: TokenInfoResponse, now: DateTime<Utc>) -> TokenInfo {
    let scopes = raw
        .scope
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let from_exp = raw
        .exp
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let from_expires_in = || {
        raw.expires_in
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|secs| now + chrono::Duration::seconds(secs))
    };

    TokenInfo {
        email: raw.email.clone(),
        scopes,
        expires_at: from_exp.or_else(from_expires_in),
    }
}
