//! Keyword scoring over the place corpus.
//!
//! Always available; the fallback whenever vector search is not.

use crate::filter::matches_state;
use crate::results::SearchResult;
use yatra_corpus::PlaceRecord;

/// Added when a query term occurs anywhere in the search text.
const TEXT_MATCH_SCORE: f32 = 1.0;
/// Added when a query term occurs in the place name.
const NAME_MATCH_SCORE: f32 = 2.0;
/// Added when a query term occurs in the place type.
const TYPE_MATCH_SCORE: f32 = 1.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    pub fn new() -> Self {
        Self
    }

    /// Rank `corpus` against `query`.
    ///
    /// `destination` must already be normalized (lower-cased, non-blank), see
    /// [`crate::filter::normalize_destination`]. Places without any matching
    /// term are dropped. Equal scores keep corpus order.
    pub fn search(
        &self,
        corpus: &[PlaceRecord],
        query: &str,
        top_k: usize,
        destination: Option<&str>,
    ) -> Vec<SearchResult> {
        let query = query.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(&PlaceRecord, f32)> = corpus
            .iter()
            .filter(|place| destination.is_none_or(|d| matches_state(&place.state, d)))
            .map(|place| (place, self.score(place, &terms)))
            .collect();

        // Stable, so ties stay in corpus order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .filter(|(_, score)| *score > 0.0)
            .take(top_k)
            .map(|(place, score)| SearchResult::lexical(place.clone(), score))
            .collect()
    }

    /// Score one place against lower-cased query terms.
    pub fn score(&self, place: &PlaceRecord, terms: &[&str]) -> f32 {
        let name = place.name.to_lowercase();
        let kind = place.kind.as_deref().map(str::to_lowercase);

        terms.iter().fold(0.0, |mut score, term| {
            if place.search_text.contains(term) {
                score += TEXT_MATCH_SCORE;
            }
            if name.contains(term) {
                score += NAME_MATCH_SCORE;
            }
            if kind.as_deref().is_some_and(|k| k.contains(term)) {
                score += TYPE_MATCH_SCORE;
            }
            score
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatra_corpus::{Attraction, Region, build_records};

    fn region(name: &str, attractions: &[(&str, &str)]) -> Region {
        Region {
            name: Some(name.to_string()),
            tourist_attractions: attractions
                .iter()
                .map(|(n, k)| Attraction {
                    name: Some(n.to_string()),
                    kind: Some(k.to_string()),
                    city: None,
                    district: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn corpus() -> Vec<PlaceRecord> {
        build_records(&[
            region(
                "Kerala",
                &[
                    ("Kovalam Beach", "Beach"),
                    ("Periyar", "Wildlife Sanctuary"),
                    ("Sabarimala", "Temple"),
                ],
            ),
            region("Tamil Nadu", &[("Marina Beach", "Beach"), ("Meenakshi", "Temple")]),
        ])
    }

    #[test]
    fn test_exact_score_composition() {
        let places = build_records(&[region("Bali", &[("Kuta Beach", "beach")])]);
        let results = LexicalScorer::new().search(&places, "beach", 10, None);

        assert_eq!(results.len(), 1);
        // search text + name + type
        assert_eq!(results[0].score, 1.0 + 2.0 + 1.5);
    }

    #[test]
    fn test_no_match_is_excluded() {
        let places = build_records(&[region("Bali", &[("Kuta Beach", "beach")])]);
        assert!(LexicalScorer::new().search(&places, "zzznomatch", 10, None).is_empty());
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let scorer = LexicalScorer::new();
        assert!(scorer.search(&corpus(), "", 10, None).is_empty());
        assert!(scorer.search(&corpus(), "   ", 10, None).is_empty());
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let results = LexicalScorer::new().search(&corpus(), "BEACH", 10, None);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_keyword_expansion_reaches_sanctuary() {
        let scorer = LexicalScorer::new();
        for query in ["safari", "animals"] {
            let results = scorer.search(&corpus(), query, 10, None);
            assert_eq!(results.len(), 1, "query {}", query);
            assert_eq!(results[0].place.name, "Periyar");
        }
    }

    #[test]
    fn test_destination_filter() {
        let scorer = LexicalScorer::new();

        let kerala = scorer.search(&corpus(), "beach", 10, Some("kerala"));
        assert_eq!(kerala.len(), 1);
        assert_eq!(kerala[0].place.name, "Kovalam Beach");

        let longer = scorer.search(&corpus(), "beach", 10, Some("keralabackwaters"));
        assert_eq!(longer.len(), 1);

        let tamil = scorer.search(&corpus(), "temple", 10, Some("tamil nadu"));
        assert!(tamil.iter().all(|r| r.place.state == "Tamil Nadu"));
        assert_eq!(tamil.len(), 1);
    }

    #[test]
    fn test_name_match_outranks_keyword_match() {
        // "sea" only appears through the beach expansion, "marina" in the name
        let results = LexicalScorer::new().search(&corpus(), "marina sea", 10, None);
        assert_eq!(results[0].place.name, "Marina Beach");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_top_k_truncation_and_tie_order() {
        let attractions: Vec<(String, &str)> =
            (0..50).map(|i| (format!("Spot {}", i), "Beach")).collect();
        let attractions: Vec<(&str, &str)> =
            attractions.iter().map(|(n, k)| (n.as_str(), *k)).collect();
        let places = build_records(&[region("Goa", &attractions)]);

        let results = LexicalScorer::new().search(&places, "beach", 10, None);

        assert_eq!(results.len(), 10);
        let ids: Vec<usize> = results.iter().map(|r| r.place.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_higher_scores_come_first() {
        let results = LexicalScorer::new().search(&corpus(), "temple kerala", 10, None);
        assert_eq!(results[0].place.name, "Sabarimala");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_zero_top_k() {
        assert!(LexicalScorer::new().search(&corpus(), "beach", 0, None).is_empty());
    }

    #[test]
    fn test_place_without_type() {
        let mut places = corpus();
        places[0].kind = None;
        let score = LexicalScorer::new().score(&places[0], &["beach"]);
        assert_eq!(score, 1.0 + 2.0);
    }
}
