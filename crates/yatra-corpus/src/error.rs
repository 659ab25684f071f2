use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a geographic dataset.
///
/// These never escape [`crate::CorpusBuilder::load`]; the builder logs them and
/// falls back to an empty corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset section '{0}' is not a list")]
    NotAList(&'static str),
}
