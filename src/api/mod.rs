//! HTTP API
//!
//! `GET /scan` runs a scan from query parameters and returns the JSON result.

mod error;
mod handlers;

pub use error::ApiError;

use crate::config::ServerConfig;
use crate::scan::Scanner;
use anyhow::Context;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

impl AppState {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner: Arc::new(scanner),
        }
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(|| async { "ok" }))
        .route("/scan", get(handlers::scan))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "HTTP API listening");
    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")?;
    Ok(())
}
