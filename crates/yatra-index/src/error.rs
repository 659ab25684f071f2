use thiserror::Error;
use yatra_embeddings::EmbeddingError;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to embed place {position}: {source}")]
    Embedding {
        position: usize,
        #[source]
        source: EmbeddingError,
    },

    #[error("vector has dimension {actual}, index expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index dimension must be non-zero")]
    ZeroDimension,
}
