//! HTTP query API.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | [`handlers::dashboard`] |
//! | `GET /api/data-sources` | [`handlers::list_sources`] |
//! | `GET /api/analysis/technology-usage` | [`handlers::technology_usage`] |
//! | `GET /api/languages/popular` | [`handlers::popular_languages`] |
//! | `GET /api/schema/{source_name}` | [`handlers::data_schema`] |

mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use insights_catalog::Catalog;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{AnalysisConfig, AppConfig};

pub use error::ApiError;

/// State shared by all handlers. Built once before serving and never mutated.
#[derive(Debug)]
pub struct AppState {
    pub catalog: Catalog,
    /// Query defaults and the `top_n` ceiling.
    pub analysis: AnalysisConfig,
    /// Dashboard page served at `/`.
    pub template: PathBuf,
}

impl AppState {
    pub fn new(catalog: Catalog, config: &AppConfig) -> Self {
        Self {
            catalog,
            analysis: config.analysis.clone(),
            template: config.server.template.clone(),
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/api/data-sources", get(handlers::list_sources))
        .route(
            "/api/analysis/technology-usage",
            get(handlers::technology_usage),
        )
        .route("/api/languages/popular", get(handlers::popular_languages))
        .route("/api/schema/{source_name}", get(handlers::data_schema))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `addr` until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    let local_addr = listener.local_addr().context("read listen address")?;

    tracing::info!(
        address = %local_addr,
        sources = state.catalog.len(),
        "Serving survey insights"
    );

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
