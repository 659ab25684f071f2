//! Start the HTTP API server

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use super::common::open_search;

pub async fn serve(dataset: Option<PathBuf>, port: u16, cors_origin: Option<String>) -> Result<()> {
    let engine = open_search(dataset)?;

    info!("Starting Yatra HTTP API server");
    match &engine.config().dataset {
        Some(path) => info!("Dataset: {:?}", path),
        None => info!("Dataset: bundled"),
    }

    crate::http::serve_http(engine, port, cors_origin).await
}
