use super::{BootstrapState, PlaceSearch};
use crate::results::SearchMode;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the search subsystem, for health and status
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// True once the bootstrap has completed.
    pub is_initialized: bool,
    pub total_places: usize,
    /// Vectors in the index; zero when vector search is unavailable.
    pub index_size: usize,
    pub search_mode: SearchMode,
    pub bootstrap_state: BootstrapState,
    pub embedding_available: bool,
}

impl PlaceSearch {
    /// Report the current state without triggering the bootstrap.
    pub fn stats(&self) -> SearchStats {
        let capabilities = self.capabilities.get();
        let index_size = capabilities
            .and_then(|c| c.index.as_ref())
            .map(|index| index.stats().size)
            .unwrap_or(0);

        SearchStats {
            is_initialized: capabilities.is_some(),
            total_places: self.corpus.get().map(<[_]>::len).unwrap_or(0),
            index_size,
            search_mode: capabilities
                .map(|c| c.set.search_mode())
                .unwrap_or(SearchMode::Text),
            bootstrap_state: self.bootstrap_state(),
            embedding_available: capabilities.is_some_and(|c| c.set.embedding_available),
        }
    }
}
