//! # munky-server
//!
//! Serverless-style API for the promo page, as one small binary:
//!
//! ```text
//!   browser ──► /api/data   ──► upstream market-data API (proxied)
//!           ──► /api/memes  ──► public/memes/ directory listing
//!           ──► /*          ──► static assets (fallback)
//! ```
//!
//! Both API routes allow any origin over GET so the page can be hosted
//! separately during development. Failures never leak upstream detail;
//! see [`error::ApiError`].

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::ServerConfig;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Reused HTTP client for the upstream proxy.
    pub client: reqwest::Client,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
///
/// Separate from [`start_server`] so tests can drive it without binding
/// a socket.
#[must_use]
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/api/data", get(routes::fetch_data))
        .route("/api/memes", get(routes::list_memes))
        .layer(cors)
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}

/// Bind and serve until a shutdown signal arrives.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let app = router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("Failed to install SIGTERM handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
