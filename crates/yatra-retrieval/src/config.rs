use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use yatra_embeddings::EmbeddingConfig;
use yatra_index::DEFAULT_BATCH_SIZE;

const DEFAULT_OVERFETCH: usize = 5;

/// Runtime settings for [`crate::PlaceSearch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Dataset file; the bundled dataset is used when unset.
    pub dataset: Option<PathBuf>,
    /// When false the embedding model is never loaded.
    pub vector_enabled: bool,
    /// Multiplier on `top_k` for the candidate pool of a filtered vector query.
    pub overfetch: usize,
    /// Records embedded per model call during the index build.
    pub batch_size: usize,
    pub embedding: EmbeddingConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            vector_enabled: true,
            overfetch: DEFAULT_OVERFETCH,
            batch_size: DEFAULT_BATCH_SIZE,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables.
    ///
    /// - `YATRA_DATASET`: dataset path
    /// - `YATRA_DISABLE_VECTOR`: `1` or `true` disables vector search
    /// - `YATRA_OVERFETCH`: over-fetch multiplier (default 5, minimum 1)
    /// - `YATRA_MODEL_DIR`, `YATRA_MODEL_DOWNLOAD`: see [`EmbeddingConfig::from_env`]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let dataset = lookup("YATRA_DATASET")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let vector_enabled = !lookup("YATRA_DISABLE_VECTOR")
            .map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let overfetch = lookup("YATRA_OVERFETCH")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .map(|n| n.max(1))
            .unwrap_or(defaults.overfetch);

        Self {
            dataset,
            vector_enabled,
            overfetch,
            embedding: EmbeddingConfig::from_lookup(&lookup),
            ..defaults
        }
    }
}
