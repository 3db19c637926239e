//! The `Mailbox` trait, the mail-access collaborator the service depends on.
//!
//! Every call takes the caller's access token explicitly. Implementations
//! hold no per-user credential state, so concurrent requests with different
//! tokens cannot interfere.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::body::MimePart;
use crate::error::MailboxError;

/// An OAuth2 access token supplied by the caller for a single request.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// First characters only, for logs.
    pub fn masked(&self) -> String {
        let token = self.expose();
        if token.chars().count() <= 10 {
            return "***".to_string();
        }
        let prefix: String = token.chars().take(10).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&self.masked()).finish()
    }
}

/// A message header as supplied by the mailbox, in original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Value of the first header named exactly `name`.
pub fn first_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.as_str())
}

/// A full message as returned by the mailbox.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    pub id: String,
    pub headers: Vec<Header>,
    pub payload: MimePart,
    /// Milliseconds since the Unix epoch, as recorded by the mailbox.
    pub internal_date_ms: Option<i64>,
}

/// What the provider knows about an access token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenInfo {
    pub email: Option<String>,
    pub scopes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Remote mailbox operations.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Ids of the most recent messages, newest first, at most `max_results`.
    async fn list_message_ids(
        &self,
        token: &AccessToken,
        max_results: u32,
    ) -> Result<Vec<String>, MailboxError>;

    /// Full message (headers, MIME tree, internal date).
    async fn get_message(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<FetchedMessage, MailboxError>;

    /// Move a message to the trash.
    async fn trash_message(&self, token: &AccessToken, id: &str) -> Result<(), MailboxError>;

    /// Delete a message permanently.
    async fn delete_message(&self, token: &AccessToken, id: &str) -> Result<(), MailboxError>;

    /// Introspect the access token.
    async fn token_info(&self, token: &AccessToken) -> Result<TokenInfo, MailboxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_header_wins_on_duplicates() {
        let headers = vec![Header::new("Subject", "Hi"), Header::new("Subject", "Bye")];
        assert_eq!(first_header(&headers, "Subject"), Some("Hi"));
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let headers = vec![Header::new("subject", "lower"), Header::new("Subject", "Upper")];
        assert_eq!(first_header(&headers, "Subject"), Some("Upper"));
        assert_eq!(first_header(&headers, "From"), None);
    }

    #[test]
    fn token_debug_is_masked() {
        let token = AccessToken::new("ya29.a0AfH6SMBsecretsecretsecret");
        let debug = format!("{token:?}");
        assert!(debug.contains("ya29.a0AfH..."));
        assert!(!debug.contains("secretsecret"));
    }

    #[test]
    fn short_token_fully_masked() {
        assert_eq!(AccessToken::new("abc").masked(), "***");
    }
}
