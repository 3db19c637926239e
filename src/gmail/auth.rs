//! Gmail OAuth2 authentication
//!
//! Server side of the authorization-code flow: builds the consent URL and
//! exchanges the returned code for an access token. Tokens are handed
//! straight back to the caller and never stored.

use reqwest::{Client, Url};
use secrecy::ExposeSecret;

use super::api::{ErrorResponse, TokenResponse};
use crate::config::OAuthConfig;
use crate::error::{ConfigError, MailboxError};
use crate::mailbox::AccessToken;

/// Scopes requested at consent: read, plus modify for trash and delete.
pub const GMAIL_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.modify",
];

/// OAuth2 client for the Google authorization server
#[derive(Debug, Clone)]
pub struct OAuthClient {
    client: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    pub fn new(client: Client, config: OAuthConfig) -> Self {
        Self { client, config }
    }

    /// Consent URL the browser is redirected to.
    pub fn authorize_url(&self) -> Result<Url, ConfigError> {
        let scope = GMAIL_SCOPES.join(" ");
        Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("scope", scope.as_str()),
            ],
        )
        .map_err(|e| ConfigError::InvalidValue {
            key: "GOOGLE_AUTH_URL".to_string(),
            message: e.to_string(),
        })
    }

    /// Exchange a one-time authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, MailboxError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.describe())
                .unwrap_or(body);
            tracing::warn!(status = status.as_u16(), %detail, "Code exchange rejected");
            return Err(MailboxError::UnexpectedStatus {
                operation: "code exchange",
                status: status.as_u16(),
                detail,
            });
        }

        let token: TokenResponse = resp.json().await?;
        tracing::info!(
            expires_in = ?token.expires_in,
            scope = ?token.scope,
            has_refresh_token = token.refresh_token.is_some(),
            "Authorization code exchanged"
        );
        Ok(AccessToken::new(token.access_token))
    }
}
