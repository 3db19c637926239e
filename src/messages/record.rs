//! The message record returned to callers.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::body::extract_body;
use crate::mailbox::{FetchedMessage, first_header};

pub const NO_SUBJECT: &str = "No Subject";
pub const UNKNOWN_SENDER: &str = "Unknown Sender";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// A flat, speakable rendering of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub subject: String,
    pub from: String,
    pub timestamp: String,
    pub body: String,
    /// Metadata block followed by the body, for text-to-speech.
    pub readable_text: String,
    pub id: String,
}

impl MessageRecord {
    /// Build a record, rendering the date in the server's local time zone.
    pub fn from_fetched(message: &FetchedMessage) -> Self {
        Self::from_fetched_in(message, &Local)
    }

    /// Build a record, rendering the date in `tz`.
    pub fn from_fetched_in<Tz>(message: &FetchedMessage, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let subject = first_header(&message.headers, "Subject")
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUBJECT)
            .to_string();
        let from = first_header(&message.headers, "From")
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SENDER)
            .to_string();
        let timestamp = format_timestamp(message.internal_date_ms, tz);
        let body = extract_body(&message.payload);
        let readable_text = readable_text(&from, &subject, &timestamp, &body);

        Self {
            subject,
            from,
            timestamp,
            body,
            readable_text,
            id: message.id.clone(),
        }
    }
}

/// Sender, subject and date first, then a blank line and the body.
///
/// Speech consumers rely on this order.
pub fn readable_text(from: &str, subject: &str, timestamp: &str, body: &str) -> String {
    format!("From: {from}\nSubject: {subject}\nDate: {timestamp}\n\n{body}")
}

/// Render a millisecond epoch as `M/D/YYYY, h:mm:ss AM` in `tz`.
pub fn format_timestamp<Tz>(epoch_ms: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    epoch_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| {
            utc.with_timezone(tz)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}
