//! Gmail API HTTP client
//!
//! Implements [`Mailbox`] over the Gmail REST API. The access token is
//! passed on every call as a bearer credential; the client itself only
//! owns the connection pool and endpoint URLs.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::debug;

use super::api::{ErrorResponse, GmailMessage, ListMessagesResponse, TokenInfoResponse};
use super::normalize::{normalize_message, normalize_token_info};
use crate::config::MailboxConfig;
use crate::error::MailboxError;
use crate::mailbox::{AccessToken, FetchedMessage, Mailbox, TokenInfo};

/// Gmail API client
#[derive(Debug, Clone)]
pub struct GmailClient {
    client: Client,
    api_base: String,
    tokeninfo_url: String,
}

impl GmailClient {
    /// Gmail caps a single listing page at 500.
    const MAX_PAGE: u32 = 500;

    /// Create a client for the endpoints in `config`.
    pub fn new(client: Client, config: &MailboxConfig) -> Self {
        Self::with_base_urls(client, &config.api_base, &config.tokeninfo_url)
    }

    /// Create a client with custom endpoints (for testing).
    pub fn with_base_urls(client: Client, api_base: &str, tokeninfo_url: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            tokeninfo_url: tokeninfo_url.to_string(),
        }
    }

    fn message_url(&self, id: &str) -> Result<String, MailboxError> {
        // Ids end up in the URL path
        if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
            return Err(MailboxError::InvalidMessageId(id.to_string()));
        }
        Ok(format!("{}/users/me/messages/{}", self.api_base, id))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, MailboxError> {
        let resp = request.send().await?;
        let status = resp.status();
        debug!(operation, status = status.as_u16(), "Gmail API response");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.describe())
            .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

        if status == StatusCode::UNAUTHORIZED {
            Err(MailboxError::Unauthorized(detail))
        } else {
            Err(MailboxError::UnexpectedStatus {
                operation,
                status: status.as_u16(),
                detail,
            })
        }
    }
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn list_message_ids(
        &self,
        token: &AccessToken,
        max_results: u32,
    ) -> Result<Vec<String>, MailboxError> {
        let url = format!("{}/users/me/messages", self.api_base);
        let request = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .query(&[("maxResults", max_results.clamp(1, Self::MAX_PAGE))]);

        let list: ListMessagesResponse = self.send(request, "list messages").await?.json().await?;
        Ok(list
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect())
    }

    async fn get_message(
        &self,
        token: &AccessToken,
        id: &str,
    ) -> Result<FetchedMessage, MailboxError> {
        let request = self
            .client
            .get(self.message_url(id)?)
            .bearer_auth(token.expose())
            .query(&[("format", "full")]);

        let message: GmailMessage = self.send(request, "get message").await?.json().await?;
        Ok(normalize_message(message))
    }

    async fn trash_message(&self, token: &AccessToken, id: &str) -> Result<(), MailboxError> {
        let url = format!("{}/trash", self.message_url(id)?);
        let request = self.client.post(url).bearer_auth(token.expose());
        self.send(request, "trash message").await?;
        Ok(())
    }

    async fn delete_message(&self, token: &AccessToken, id: &str) -> Result<(), MailboxError> {
        let request = self
            .client
            .delete(self.message_url(id)?)
            .bearer_auth(token.expose());
        self.send(request, "delete message").await?;
        Ok(())
    }

    async fn token_info(&self, token: &AccessToken) -> Result<TokenInfo, MailboxError> {
        let request = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("access_token", token.expose())]);

        let raw: TokenInfoResponse = match self.send(request, "token info").await {
            Ok(resp) => resp.json().await?,
            // tokeninfo answers 400 for expired or unknown tokens
            Err(MailboxError::UnexpectedStatus {
                status: 400,
                detail,
                ..
            }) => return Err(MailboxError::Unauthorized(detail)),
            Err(e) => return Err(e),
        };
        Ok(normalize_token_info(raw, chrono::Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GmailClient {
        GmailClient::with_base_urls(
            Client::new(),
            "http://127.0.0.1:1/gmail/v1/",
            "http://127.0.0.1:1/tokeninfo",
        )
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(
            client().message_url("abc").unwrap(),
            "http://127.0.0.1:1/gmail/v1/users/me/messages/abc"
        );
    }

    #[test]
    fn path_traversal_ids_rejected() {
        for id in ["", "a/b", "..", "a\\b"] {
            assert!(
                matches!(client().message_url(id), Err(MailboxError::InvalidMessageId(_))),
                "id {id:?} should be rejected"
            );
        }
    }
}
