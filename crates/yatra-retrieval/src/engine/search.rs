//! Query execution for PlaceSearch.

use super::PlaceSearch;
use crate::error::SearchError;
use crate::filter::{matches_state, normalize_destination};
use crate::results::{SearchMode, SearchResult, SearchResults};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};
use yatra_corpus::PlaceRecord;
use yatra_index::VectorIndex;

/// Maximum limit for search results to prevent excessive memory usage.
pub const MAX_SEARCH_LIMIT: usize = 1000;

impl PlaceSearch {
    /// Rank places against `query`, optionally restricted to a destination
    /// state.
    ///
    /// Uses the vector index when the bootstrap brought one up, otherwise (or
    /// when embedding this query fails) the lexical scorer. Never fails; no
    /// match is an empty list.
    pub fn search(&self, query: &str, top_k: usize, destination: Option<&str>) -> Vec<SearchResult> {
        self.run(query, top_k, destination).0
    }

    /// [`PlaceSearch::search`] with timing and the retrieval mode that
    /// answered.
    pub fn search_with_timing(
        &self,
        query: &str,
        top_k: usize,
        destination: Option<&str>,
    ) -> SearchResults {
        let start = Instant::now();
        let (results, mode) = self.run(query, top_k, destination);
        let search_time = start.elapsed().as_millis() as u64;

        info!(
            query = %query,
            results = results.len(),
            mode = %mode,
            time_ms = search_time,
            "Search completed"
        );
        SearchResults::new(query.to_string(), results, search_time, mode)
    }

    /// Every place whose state matches `state_name` (case-insensitive
    /// containment either way), in corpus order.
    ///
    /// Loads the corpus when needed but never builds the vector index.
    pub fn places_by_state(&self, state_name: &str) -> Vec<PlaceRecord> {
        let Some(state) = normalize_destination(Some(state_name)) else {
            return Vec::new();
        };

        self.corpus
            .load()
            .iter()
            .filter(|place| matches_state(&place.state, &state))
            .cloned()
            .collect()
    }

    fn run(&self, query: &str, top_k: usize, destination: Option<&str>) -> (Vec<SearchResult>, SearchMode) {
        let index = self.index();

        let safe_limit = top_k.min(MAX_SEARCH_LIMIT);
        if top_k > MAX_SEARCH_LIMIT {
            warn!(
                requested = top_k,
                max = MAX_SEARCH_LIMIT,
                "Requested limit exceeds maximum, capping to {}",
                MAX_SEARCH_LIMIT
            );
        }

        let destination = normalize_destination(destination);
        let corpus = self.corpus.load();

        if let Some(index) = index {
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
                self.search_vector(index, corpus, query, safe_limit, destination.as_deref())
            }));
            match attempt {
                Ok(Ok(results)) => return (results, SearchMode::Vector),
                Ok(Err(e)) => {
                    warn!(error = %e, "Vector search failed, falling back to text search");
                }
                Err(_) => {
                    warn!("Vector search panicked, falling back to text search");
                }
            }
        }

        let results = self
            .lexical
            .search(corpus, query, safe_limit, destination.as_deref());
        (results, SearchMode::Text)
    }

    fn search_vector(
        &self,
        index: &VectorIndex,
        corpus: &[PlaceRecord],
        query: &str,
        top_k: usize,
        destination: Option<&str>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed(&query.to_lowercase())?;

        // Filtering happens after retrieval, so fetch extra candidates.
        let k = match destination {
            Some(_) => top_k.saturating_mul(self.config.overfetch.max(1)).min(corpus.len()),
            None => top_k,
        };
        let hits = index.query(&embedding, k)?;
        debug!(k, candidates = hits.len(), "Vector candidates retrieved");

        let results = hits
            .into_iter()
            .filter_map(|(position, distance)| corpus.get(position).map(|place| (place, distance)))
            .filter(|(place, _)| destination.is_none_or(|d| matches_state(&place.state, d)))
            .take(top_k)
            .map(|(place, distance)| SearchResult::vector(place.clone(), distance))
            .collect();

        Ok(results)
    }
}
