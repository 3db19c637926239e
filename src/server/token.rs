//! Access-token extraction from requests.

use axum::http::{HeaderMap, StatusCode, header};

use crate::error::ApiError;
use crate::mailbox::AccessToken;

/// Token from the `access_token` query parameter, else from an
/// `Authorization: Bearer` header.
pub fn extract_token(query_token: Option<&str>, headers: &HeaderMap) -> Option<AccessToken> {
    query_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(headers))
        .map(AccessToken::new)
}

/// Like [`extract_token`], failing with `missing_status` when absent.
pub fn require_token(
    query_token: Option<&str>,
    headers: &HeaderMap,
    missing_status: StatusCode,
) -> Result<AccessToken, ApiError> {
    extract_token(query_token, headers).ok_or(ApiError::MissingToken {
        status: missing_status,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}
