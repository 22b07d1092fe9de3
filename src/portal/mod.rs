//! Upload portal: an HTML form that takes a query CSV and renders the
//! matched prices, plus a small JSON search endpoint.

pub mod error;
pub mod form;
pub mod handlers;
pub mod template;

use crate::config::AppConfig;
use crate::matcher::MatcherFactory;
use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared by every request: form defaults and the matcher factory.
pub struct PortalState {
    pub defaults: AppConfig,
    pub factory: Arc<dyn MatcherFactory>,
}

impl PortalState {
    pub fn new(defaults: AppConfig, factory: Arc<dyn MatcherFactory>) -> Self {
        Self { defaults, factory }
    }
}

pub fn build_router(state: Arc<PortalState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::form_page).post(handlers::upload))
        .route("/upload", post(handlers::upload))
        .route("/search", post(handlers::search_api))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the portal until Ctrl+C.
pub async fn run(state: Arc<PortalState>) -> anyhow::Result<()> {
    let listener =
        tokio::net::TcpListener::bind((state.defaults.host.as_str(), state.defaults.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("Serving pricing portal on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down portal...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
