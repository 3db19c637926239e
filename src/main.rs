use std::net::SocketAddr;
use std::sync::Arc;

use inbox_voice::config::ServerConfig;
use inbox_voice::error::{MailboxError, Result};
use inbox_voice::gmail::{GmailClient, OAuthClient};
use inbox_voice::messages::{AssemblerConfig, MessageAssembler};
use inbox_voice::server::{AppState, app_routes};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().inspect_err(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export CLIENT_ID=... CLIENT_SECRET=... REDIRECT_URI=...");
    })?;

    let addr = SocketAddr::new(config.bind_addr, config.port);
    eprintln!("📬 Inbox Voice v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{addr}");
    eprintln!("   Frontend: {}", config.frontend_url);

    let http = reqwest::Client::builder()
        .timeout(config.mailbox.call_timeout)
        .build()
        .map_err(MailboxError::from)?;

    let gmail = GmailClient::new(http.clone(), &config.mailbox);
    let assembler = MessageAssembler::new(
        Arc::new(gmail),
        AssemblerConfig::from(&config.mailbox),
    );
    let state = AppState {
        assembler,
        oauth: OAuthClient::new(http, config.oauth.clone()),
        frontend_url: config.frontend_url.clone(),
    };
    let app = app_routes(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
