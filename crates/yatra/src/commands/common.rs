//! Common utilities for CLI commands

use anyhow::Result;
use std::path::PathBuf;
use yatra_retrieval::{PlaceSearch, SearchConfig};

/// Environment configuration with the `--dataset` flag applied on top.
///
/// An explicit dataset path must exist; a missing file is only tolerated when
/// it comes from the environment.
pub fn resolve_config(dataset: Option<PathBuf>) -> Result<SearchConfig> {
    let mut config = SearchConfig::from_env();

    if let Some(path) = dataset {
        if !path.exists() {
            anyhow::bail!("Dataset not found: {:?}", path);
        }
        config.dataset = Some(path);
    }

    Ok(config)
}

pub fn open_search(dataset: Option<PathBuf>) -> Result<PlaceSearch> {
    Ok(PlaceSearch::from_config(resolve_config(dataset)?))
}
