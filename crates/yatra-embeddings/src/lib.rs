pub mod error;
pub mod model;
pub mod pooling;
pub mod provider;

#[cfg(feature = "onnx")]
mod download;

pub use error::EmbeddingError;
pub use model::{EmbeddingConfig, EmbeddingModel, create_embedding_model};
pub use pooling::{l2_normalize, mean_pool};
pub use provider::{EmbeddingProvider, ModelLoader};

#[cfg(feature = "onnx")]
pub use download::ensure_models_downloaded;

/// Dimension of MiniLM embeddings
pub const EMBEDDING_DIM: usize = 384;
