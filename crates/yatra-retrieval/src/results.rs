use serde::{Deserialize, Serialize};
use std::fmt;
use yatra_corpus::PlaceRecord;
use yatra_index::similarity_from_distance;

/// Which retrieval path answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Vector,
    Text,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vector => write!(f, "vector"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// A place matched by a query. Higher `score` is more relevant on both paths,
/// but the scales differ: vector scores lie in (0, 1], lexical scores are
/// keyword tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub place: PlaceRecord,
    pub score: f32,
    /// L2 distance to the query vector; only set on the vector path.
    #[serde(default)]
    pub distance: Option<f32>,
    pub source: SearchMode,
}

impl SearchResult {
    pub fn lexical(place: PlaceRecord, score: f32) -> Self {
        Self {
            place,
            score,
            distance: None,
            source: SearchMode::Text,
        }
    }

    pub fn vector(place: PlaceRecord, distance: f32) -> Self {
        Self {
            place,
            score: similarity_from_distance(distance),
            distance: Some(distance),
            source: SearchMode::Vector,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_count: usize,
    pub search_time_ms: u64,
    pub mode: SearchMode,
}

impl SearchResults {
    pub fn new(query: String, results: Vec<SearchResult>, search_time_ms: u64, mode: SearchMode) -> Self {
        let total_count = results.len();
        Self {
            query,
            results,
            total_count,
            search_time_ms,
            mode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> PlaceRecord {
        PlaceRecord {
            id: 0,
            name: name.to_string(),
            kind: Some("Beach".to_string()),
            location: "Calangute".to_string(),
            state: "Goa".to_string(),
            state_code: "GA".to_string(),
            region: "West India".to_string(),
            search_text: format!("{} beach goa", name.to_lowercase()),
        }
    }

    #[test]
    fn test_vector_result_score() {
        let result = SearchResult::vector(place("Baga Beach"), 1.0);
        assert_eq!(result.score, 0.5);
        assert_eq!(result.distance, Some(1.0));
        assert_eq!(result.source, SearchMode::Vector);
    }

    #[test]
    fn test_lexical_result_has_no_distance() {
        let result = SearchResult::lexical(place("Baga Beach"), 4.5);
        assert_eq!(result.score, 4.5);
        assert_eq!(result.distance, None);
        assert_eq!(result.source, SearchMode::Text);
    }

    #[test]
    fn test_result_serializes_flat() {
        let json = serde_json::to_value(SearchResult::lexical(place("Baga Beach"), 3.0)).unwrap();

        assert_eq!(json["name"], "Baga Beach");
        assert_eq!(json["stateCode"], "GA");
        assert_eq!(json["type"], "Beach");
        assert_eq!(json["score"], 3.0);
        assert_eq!(json["source"], "text");
        assert!(json["distance"].is_null());
    }

    #[test]
    fn test_result_round_trips() {
        let original = SearchResult::vector(place("Palolem Beach"), 0.25);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: SearchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_search_mode_display() {
        assert_eq!(SearchMode::Vector.to_string(), "vector");
        assert_eq!(SearchMode::Text.to_string(), "text");
    }

    #[test]
    fn test_search_results_counts() {
        let results = SearchResults::new(
            "beach".to_string(),
            vec![
                SearchResult::lexical(place("A"), 3.0),
                SearchResult::lexical(place("B"), 2.0),
                SearchResult::lexical(place("C"), 1.0),
            ],
            12,
            SearchMode::Text,
        );

        assert_eq!(results.total_count, 3);
        assert!(!results.is_empty());
        assert_eq!(results.results[1].place.name, "B");

        let empty = SearchResults::new("zzz".to_string(), Vec::new(), 0, SearchMode::Text);
        assert_eq!(empty.total_count, 0);
        assert!(empty.is_empty());
    }
}
