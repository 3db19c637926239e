//! Gmail API integration
//!
//! This module provides:
//! - the OAuth2 authorization-code flow (consent URL, code exchange)
//! - a Gmail REST client implementing [`crate::mailbox::Mailbox`]
//! - conversion of API responses into mailbox types

mod auth;
mod client;
mod normalize;

pub use auth::{GMAIL_SCOPES, OAuthClient};
pub use client::GmailClient;
pub use normalize::{normalize_message, normalize_part, normalize_token_info};

/// Gmail API response types
pub mod api {
    use serde::Deserialize;

    /// Response from listing messages
    #[derive(Debug, Deserialize)]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
    }

    /// Reference to a message in a listing
    #[derive(Debug, Deserialize)]
    pub struct MessageRef {
        pub id: String,
    }

    /// Full message from Gmail API
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        pub internal_date: Option<String>,
        pub payload: Option<MessagePart>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Deserialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Message body (base64url encoded)
    #[derive(Debug, Deserialize)]
    pub struct MessageBody {
        pub data: Option<String>,
    }

    /// Message part; the top-level payload has the same shape
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub mime_type: Option<String>,
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Response from the OAuth2 token endpoint
    #[derive(Debug, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
        pub refresh_token: Option<String>,
        pub expires_in: Option<u64>,
        pub scope: Option<String>,
    }

    /// Response from the tokeninfo endpoint; numbers arrive as strings
    #[derive(Debug, Deserialize)]
    pub struct TokenInfoResponse {
        pub email: Option<String>,
        pub scope: Option<String>,
        pub exp: Option<String>,
        pub expires_in: Option<String>,
    }

    /// Error body returned by Google APIs
    #[derive(Debug, Deserialize)]
    pub struct ErrorResponse {
        pub error: Option<ErrorDetail>,
        pub error_description: Option<String>,
    }

    /// Either a structured API error or a bare OAuth error code
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum ErrorDetail {
        Api { message: String },
        Code(String),
    }

    impl ErrorResponse {
        /// Best human-readable description of the failure.
        pub fn describe(&self) -> Option<String> {
            if let Some(desc) = &self.error_description {
                return Some(desc.clone());
            }
            match &self.error {
                Some(ErrorDetail::Api { message, .. }) => Some(message.clone()),
                Some(ErrorDetail::Code(code)) => Some(code.clone()),
                None => None,
            }
        }
    }
}
