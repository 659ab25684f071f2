use thiserror::Error;
use yatra_embeddings::EmbeddingError;
use yatra_index::IndexError;

/// Failures on the vector path of a single query.
///
/// Never returned to callers of [`crate::PlaceSearch::search`]; the query is
/// answered by lexical scoring instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector index query failed: {0}")]
    Index(#[from] IndexError),
}
