//! HTTP surface: router, shared state and middleware.

mod routes;
pub mod token;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::gmail::OAuthClient;
use crate::messages::MessageAssembler;

pub use token::{extract_token, require_token};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub assembler: MessageAssembler,
    pub oauth: OAuthClient,
    /// Where the browser lands after the OAuth callback.
    pub frontend_url: String,
}

/// Build the router with CORS and request tracing applied.
pub fn app_routes(state: AppState, allowed_origins: &[String]) -> Router {
    routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(allowed_origins)),
    )
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
