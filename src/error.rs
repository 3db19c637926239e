//! Error types for inbox-voice.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the mail-access collaborator.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    #[error("Access token rejected: {0}")]
    Unauthorized(String),

    #[error("{operation} returned status code {status}: {detail}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid message ID: {0:?}")]
    InvalidMessageId(String),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl From<reqwest::Error> for MailboxError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MailboxError::InvalidResponse(e.to_string())
        } else {
            MailboxError::Http(e.to_string())
        }
    }
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No access token in the query string or `Authorization` header.
    /// The listing endpoint answers 400, the others 401.
    #[error("Access token is required")]
    MissingToken { status: StatusCode },

    #[error("Authorization code is required")]
    MissingCode,

    #[error("Access token rejected: {0}")]
    AuthFailure(String),

    #[error("Failed to fetch emails: {0}")]
    FetchFailure(String),

    #[error("Failed to delete email: {0}")]
    DeleteFailure(String),

    #[error("Failed to verify permissions: {0}")]
    PermissionCheck(String),

    #[error("OAuth2 authentication failed: {0}")]
    OAuth(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken { status } => *status,
            ApiError::MissingCode => StatusCode::BAD_REQUEST,
            ApiError::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            ApiError::FetchFailure(_)
            | ApiError::DeleteFailure(_)
            | ApiError::PermissionCheck(_)
            | ApiError::OAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short human-readable summary used as the `error` field.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MissingToken { .. } => "Access token is required",
            ApiError::MissingCode => "Authorization code is required",
            ApiError::AuthFailure(_) => "Access token rejected",
            ApiError::FetchFailure(_) => "Failed to fetch emails",
            ApiError::DeleteFailure(_) => "Failed to delete email",
            ApiError::PermissionCheck(_) => "Failed to verify permissions",
            ApiError::OAuth(_) => "OAuth2 authentication failed",
        }
    }

    /// Underlying failure detail, when there is one.
    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::MissingToken { .. } => {
                Some("No access token provided in query or authorization header")
            }
            ApiError::MissingCode => None,
            ApiError::AuthFailure(d)
            | ApiError::FetchFailure(d)
            | ApiError::DeleteFailure(d)
            | ApiError::PermissionCheck(d)
            | ApiError::OAuth(d) => Some(d),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match self.details() {
            Some(details) => serde_json::json!({
                "error": self.message(),
                "details": details,
            }),
            None => serde_json::json!({ "error": self.message() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_maps_to_401() {
        let err = ApiError::AuthFailure("invalid_token".into());
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.details(), Some("invalid_token"));
    }

    #[test]
    fn fetch_and_delete_failures_map_to_500() {
        assert_eq!(
            ApiError::FetchFailure("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::DeleteFailure("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_token_keeps_requested_status() {
        let err = ApiError::MissingToken {
            status: StatusCode::BAD_REQUEST,
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Access token is required");
    }

    #[test]
    fn unexpected_status_display_includes_operation() {
        let err = MailboxError::UnexpectedStatus {
            operation: "trash",
            status: 404,
            detail: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "trash returned status code 404: Not Found");
    }
}
