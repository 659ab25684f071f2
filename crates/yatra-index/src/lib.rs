//! In-memory vector index over the place corpus.

pub mod error;
pub mod flat;

pub use error::IndexError;
pub use flat::{DEFAULT_BATCH_SIZE, IndexStats, VectorIndex, similarity_from_distance};
