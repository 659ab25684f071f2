//! HTTP API routes and handlers

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{debug, error};
use yatra_retrieval::{PlaceSearch, SearchStats};

use super::types::*;

type AppState = Arc<PlaceSearch>;
type ApiError = (StatusCode, Json<ErrorResponse>);

/// Longest accepted query, in characters.
const MAX_QUERY_LEN: usize = 500;
const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

/// Create the router with all API endpoints
pub fn create_router(engine: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/search", post(search))
        .route("/places/{state}", get(places))
        .with_state(engine)
}

fn bad_request(error: &str, code: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error, code)))
}

fn internal_error(error: &str, code: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(error, code)),
    )
}

// ============================================
// Health & Stats
// ============================================

async fn health(State(engine): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ready: engine.capabilities().is_some(),
    })
}

async fn stats(State(engine): State<AppState>) -> Json<SearchStats> {
    Json(engine.stats())
}

// ============================================
// Search
// ============================================

async fn search(
    State(engine): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(bad_request("Query cannot be empty", "INVALID_QUERY"));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(bad_request(
            "Query exceeds maximum length of 500 characters",
            "QUERY_TOO_LONG",
        ));
    }

    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let destination = req.destination;

    debug!(query = %query, limit = %limit, destination = ?destination, "HTTP search request");

    // The first search may block on the bootstrap and model inference.
    let results = tokio::task::spawn_blocking(move || {
        engine.search_with_timing(&query, limit, destination.as_deref())
    })
    .await
    .map_err(|e| {
        error!("Search task failed: {}", e);
        internal_error("Search failed", "SEARCH_ERROR")
    })?;

    Ok(Json(SearchResponse {
        total_count: results.total_count,
        search_time_ms: results.search_time_ms,
        mode: results.mode,
        results: results.results,
    }))
}

// ============================================
// Places
// ============================================

async fn places(
    State(engine): State<AppState>,
    Path(state): Path<String>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let state = state.trim().to_string();
    if state.is_empty() {
        return Err(bad_request("State cannot be empty", "INVALID_STATE"));
    }

    debug!(state = %state, "HTTP places request");

    let lookup = state.clone();
    let places = tokio::task::spawn_blocking(move || engine.places_by_state(&lookup))
        .await
        .map_err(|e| {
            error!("Places task failed: {}", e);
            internal_error("Failed to list places", "PLACES_ERROR")
        })?;

    Ok(Json(PlacesResponse {
        state,
        total_count: places.len(),
        places,
    }))
}
