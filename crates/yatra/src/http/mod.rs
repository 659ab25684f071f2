//! HTTP API server for Yatra
//!
//! Exposes place search to the itinerary service over REST endpoints.

mod routes;
mod types;


pub use routes::create_router;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use yatra_retrieval::PlaceSearch;

/// Maximum request body size (1 MB). Prevents OOM from oversized payloads.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Start the HTTP API server.
///
/// The capability bootstrap starts in the background so the listener comes up
/// immediately; early requests wait for it inside the search call.
pub async fn serve_http(engine: PlaceSearch, port: u16, cors_origin: Option<String>) -> Result<()> {
    let engine = Arc::new(engine);

    let warmup = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || {
        let capabilities = warmup.initialize();
        info!(mode = %capabilities.search_mode(), "Search warm-up finished");
    });

    let cors = if let Some(origin) = cors_origin {
        CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        warn!("No CORS origin specified, allowing all origins. Set --cors-origin in production.");
        CorsLayer::very_permissive()
    };

    let app: Router = create_router(engine)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP API server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
