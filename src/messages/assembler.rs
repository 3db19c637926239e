//! Message assembler: turns mailbox calls into message records.
//!
//! Every collaborator call is bounded by the configured timeout; a hung
//! upstream surfaces as a failure instead of a stuck request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::record::MessageRecord;
use crate::config::MailboxConfig;
use crate::error::{ApiError, MailboxError};
use crate::mailbox::{AccessToken, Mailbox};

/// Assembler settings.
#[derive(Debug, Clone, Copy)]
pub struct AssemblerConfig {
    /// Messages per listing.
    pub page_size: u32,
    /// Upper bound on any single mailbox call.
    pub call_timeout: Duration,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        let mailbox = MailboxConfig::default();
        Self::from(&mailbox)
    }
}

impl From<&MailboxConfig> for AssemblerConfig {
    fn from(config: &MailboxConfig) -> Self {
        Self {
            page_size: config.page_size,
            call_timeout: config.call_timeout,
        }
    }
}

/// Result of a token introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionReport {
    pub success: bool,
    pub email: Option<String>,
    pub scopes: Vec<String>,
    /// Milliseconds until the token expires; negative once expired.
    pub expires_in: Option<i64>,
}

/// Orchestrates mailbox calls for one request at a time.
#[derive(Clone)]
pub struct MessageAssembler {
    mailbox: Arc<dyn Mailbox>,
    config: AssemblerConfig,
}

impl MessageAssembler {
    pub fn new(mailbox: Arc<dyn Mailbox>, config: AssemblerConfig) -> Self {
        Self { mailbox, config }
    }

    /// Fetch one message and render it.
    pub async fn assemble(&self, token: &AccessToken, id: &str) -> Result<MessageRecord, ApiError> {
        let message = self
            .call("get message", self.mailbox.get_message(token, id))
            .await
            .map_err(fetch_failure)?;
        Ok(MessageRecord::from_fetched(&message))
    }

    /// The most recent page of messages, in listed order.
    ///
    /// All message fetches are in flight together; the first failure fails
    /// the whole listing.
    pub async fn list_recent(&self, token: &AccessToken) -> Result<Vec<MessageRecord>, ApiError> {
        let ids = self
            .call(
                "list messages",
                self.mailbox.list_message_ids(token, self.config.page_size),
            )
            .await
            .map_err(fetch_failure)?;

        if ids.is_empty() {
            debug!("Mailbox reported no messages");
            return Ok(Vec::new());
        }

        let fetches: Vec<_> = ids.iter().map(|id| self.assemble(token, id)).collect();
        let records = try_join_all(fetches).await?;

        info!(count = records.len(), "Assembled message page");
        Ok(records)
    }

    /// Move a message to the trash.
    pub async fn trash(&self, token: &AccessToken, id: &str) -> Result<(), ApiError> {
        info!(email_id = %id, token = %token.masked(), "Trashing message");
        self.call("trash message", self.mailbox.trash_message(token, id))
            .await
            .map_err(delete_failure)
    }

    /// Delete a message permanently.
    pub async fn delete_permanently(&self, token: &AccessToken, id: &str) -> Result<(), ApiError> {
        info!(email_id = %id, token = %token.masked(), "Permanently deleting message");
        self.call("delete message", self.mailbox.delete_message(token, id))
            .await
            .map_err(delete_failure)
    }

    /// Email, scopes and remaining lifetime of the token.
    pub async fn verify_permissions(&self, token: &AccessToken) -> Result<PermissionReport, ApiError> {
        let info = self
            .call("token info", self.mailbox.token_info(token))
            .await
            .map_err(|e| match e {
                MailboxError::Unauthorized(detail) => ApiError::AuthFailure(detail),
                other => ApiError::PermissionCheck(other.to_string()),
            })?;

        let now = Utc::now();
        Ok(PermissionReport {
            success: true,
            email: info.email,
            scopes: info.scopes,
            expires_in: info
                .expires_at
                .map(|at| at.signed_duration_since(now).num_milliseconds()),
        })
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, MailboxError>>,
    ) -> Result<T, MailboxError> {
        let timeout = self.config.call_timeout;
        tokio::time::timeout(timeout, fut)
            .await
            .unwrap_or_else(|_| Err(MailboxError::Timeout { operation, timeout }))
    }
}

fn fetch_failure(e: MailboxError) -> ApiError {
    match e {
        MailboxError::Unauthorized(detail) => ApiError::AuthFailure(detail),
        other => ApiError::FetchFailure(other.to_string()),
    }
}

fn delete_failure(e: MailboxError) -> ApiError {
    match e {
        MailboxError::Unauthorized(detail) => ApiError::AuthFailure(detail),
        other => ApiError::DeleteFailure(other.to_string()),
    }
}
