//! Route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{delete, get},
};
use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use super::token::require_token;
use crate::error::ApiError;
use crate::messages::{MessageRecord, PermissionReport};

pub(super) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth", get(auth_redirect))
        .route("/auth/callback", get(auth_callback))
        .route("/emails", get(list_emails))
        .route("/emails/{id}", delete(trash_email))
        .route("/emails/{id}/permanent", delete(delete_email))
        .route("/verify-permissions", get(verify_permissions))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inbox-voice"
    }))
}

// ── OAuth ───────────────────────────────────────────────────────────────

async fn auth_redirect(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    let url = state
        .oauth
        .authorize_url()
        .map_err(|e| ApiError::OAuth(e.to_string()))?;
    Ok(Redirect::to(url.as_str()))
}

async fn auth_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ApiError::MissingCode)?;

    let token = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(|e| ApiError::OAuth(e.to_string()))?;

    let target = Url::parse_with_params(&state.frontend_url, &[("access_token", token.expose())])
        .map_err(|e| ApiError::OAuth(format!("invalid frontend URL: {e}")))?;
    info!(token = %token.masked(), "OAuth callback complete, redirecting to frontend");
    Ok(Redirect::to(target.as_str()))
}

// ── Emails ──────────────────────────────────────────────────────────────

async fn list_emails(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    let token = require_token(
        query.access_token.as_deref(),
        &headers,
        StatusCode::BAD_REQUEST,
    )?;
    let records = state.assembler.list_recent(&token).await?;
    Ok(Json(records))
}

async fn trash_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = require_token(
        query.access_token.as_deref(),
        &headers,
        StatusCode::UNAUTHORIZED,
    )?;
    state.assembler.trash(&token, &id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Email moved to trash",
        "emailId": id
    })))
}

async fn delete_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = require_token(
        query.access_token.as_deref(),
        &headers,
        StatusCode::UNAUTHORIZED,
    )?;
    state.assembler.delete_permanently(&token, &id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Email permanently deleted",
        "emailId": id
    })))
}

// ── Permissions ─────────────────────────────────────────────────────────

async fn verify_permissions(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    headers: HeaderMap,
) -> Result<Json<PermissionReport>, ApiError> {
    let token = require_token(
        query.access_token.as_deref(),
        &headers,
        StatusCode::UNAUTHORIZED,
    )?;
    let report = state.assembler.verify_permissions(&token).await?;
    Ok(Json(report))
}
