use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::api::types::*;

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        error!(error_type, message = %message, "request failed");

        let error_response = ErrorResponse::new(error_type, message);
        (status, Json(error_response)).into_response()
    }
}

/// Search the index: `GET /?search=<phrase>`.
///
/// A missing `search` parameter is an empty phrase and matches nothing.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let phrase = params.search.unwrap_or_default();

    let start = Instant::now();
    let results = state.engine.search(&phrase);
    state
        .metrics
        .record_search(start.elapsed().as_secs_f64(), results.len());

    info!(query = %phrase, results = results.len(), "search served");
    Json(results)
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        terms: state.engine.index().len(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
