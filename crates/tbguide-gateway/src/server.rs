//! HTTP server implementation using Axum.

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tbguide_core::config::TbGuideConfig;
use tbguide_core::error::{Result, TbGuideError};
use tbguide_corpus::CorpusStore;
use tbguide_embeddings::{Embedder, create_embedder};

use crate::routes;

/// Shared state for the gateway server.
pub struct AppState {
    pub config: TbGuideConfig,
    /// The corpus, loaded once and read-only for the process lifetime.
    pub store: Arc<CorpusStore>,
    /// Client for the external embedding service.
    pub embedder: Arc<dyn Embedder>,
    pub start_time: std::time::Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/ask", post(routes::ask))
        .route("/api/v1/health", get(routes::health_check))
        .route("/api/v1/corpus/stats", get(routes::corpus_stats))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Load the corpus, create the embedder, and serve until shutdown.
pub async fn start(config: TbGuideConfig) -> Result<()> {
    let store = CorpusStore::shared(&config)?;
    let embedder: Arc<dyn Embedder> = Arc::from(create_embedder(&config)?);
    tracing::info!(
        "Embedding provider: {} | corpus: {} chunks",
        embedder.name(),
        store.len()
    );

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = AppState {
        config,
        store,
        embedder,
        start_time: std::time::Instant::now(),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TbGuideError::Http(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Gateway listening on http://{addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| TbGuideError::Http(e.to_string()))
}
