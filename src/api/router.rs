use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::metrics::IndexMetrics;
use crate::query::QueryEngine;

use super::handlers::*;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: QueryEngine,
    pub metrics: Arc<IndexMetrics>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Search
        .route("/", get(search))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
