use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The model could not be loaded. Permanent for the provider's lifetime.
    #[error("embedding model unavailable")]
    Unavailable,

    #[error("embedding inference failed: {0}")]
    Inference(String),

    #[error("embedding has dimension {actual}, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}
