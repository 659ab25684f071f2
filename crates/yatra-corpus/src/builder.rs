//! Flattens a geographic dataset into searchable place records.

use crate::dataset::{PlaceSource, Region};
use crate::error::CorpusError;
use crate::keywords::expand_type_keywords;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Region used for territories that do not name a broader area.
pub const DEFAULT_REGION: &str = "India";

/// One tourist attraction in the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    /// Position in the corpus. Stable only for one loaded corpus.
    pub id: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub location: String,
    pub state: String,
    pub state_code: String,
    pub region: String,
    /// Lower-cased blob matched by lexical search and embedded for vector search.
    pub search_text: String,
}

/// Builds the corpus once and hands out the same records afterwards.
pub struct CorpusBuilder {
    source: Arc<dyn PlaceSource>,
    corpus: OnceLock<Vec<PlaceRecord>>,
}

impl CorpusBuilder {
    pub fn new(source: Arc<dyn PlaceSource>) -> Self {
        Self {
            source,
            corpus: OnceLock::new(),
        }
    }

    /// Load the corpus, building it on first call.
    ///
    /// Concurrent first callers block until the single build finishes. A
    /// dataset that cannot be read yields an empty corpus.
    pub fn load(&self) -> &[PlaceRecord] {
        self.corpus.get_or_init(|| self.build())
    }

    /// The corpus if already loaded, without triggering a build.
    pub fn get(&self) -> Option<&[PlaceRecord]> {
        self.corpus.get().map(Vec::as_slice)
    }

    fn build(&self) -> Vec<PlaceRecord> {
        let start = Instant::now();
        let mut records = Vec::new();

        for (section, regions) in [
            ("states", read_section(|| self.source.states())),
            ("territories", read_section(|| self.source.territories())),
        ] {
            match regions {
                Some(Ok(regions)) => {
                    for region in &regions {
                        append_region(&mut records, region);
                    }
                }
                Some(Err(e)) => warn!(section, "Dataset unavailable, continuing without it: {}", e),
                None => warn!(section, "Dataset source panicked, continuing without it"),
            }
        }

        info!(
            places = records.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "Place corpus loaded"
        );
        records
    }
}

/// Run one source read, turning a panic into `None`.
fn read_section<F>(read: F) -> Option<Result<Vec<Region>, CorpusError>>
where
    F: FnOnce() -> Result<Vec<Region>, CorpusError>,
{
    panic::catch_unwind(AssertUnwindSafe(read)).ok()
}

/// Build the corpus for a fixed list of regions, bypassing any source.
pub fn build_records(regions: &[Region]) -> Vec<PlaceRecord> {
    let mut records = Vec::new();
    for region in regions {
        append_region(&mut records, region);
    }
    records
}

fn append_region(records: &mut Vec<PlaceRecord>, region: &Region) {
    let Some(state) = non_blank(region.name.as_deref()) else {
        debug!("Skipping region without a name");
        return;
    };
    let state_code = region
        .code
        .as_deref()
        .and_then(|c| non_blank(Some(c)))
        .map(str::to_uppercase)
        .unwrap_or_else(|| derive_state_code(state));
    let area = non_blank(region.region.as_deref()).unwrap_or(DEFAULT_REGION);

    for attraction in &region.tourist_attractions {
        let Some(name) = non_blank(attraction.name.as_deref()) else {
            debug!(state, "Skipping attraction without a name");
            continue;
        };
        let kind = non_blank(attraction.kind.as_deref());
        let location = attraction.location().trim();

        let search_text = compose_search_text(name, kind, location, state, area, &region.famous_for);

        records.push(PlaceRecord {
            id: records.len(),
            name: name.to_string(),
            kind: kind.map(str::to_string),
            location: location.to_string(),
            state: state.to_string(),
            state_code: state_code.clone(),
            region: area.to_string(),
            search_text,
        });
    }
}

fn compose_search_text(
    name: &str,
    kind: Option<&str>,
    location: &str,
    state: &str,
    area: &str,
    famous_for: &[String],
) -> String {
    let expansion = kind.map(expand_type_keywords).unwrap_or_default();

    [name, kind.unwrap_or(""), location, state, area]
        .into_iter()
        .chain(famous_for.iter().map(String::as_str))
        .chain(expansion)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Short code from a region name: initials of each word ("Tamil Nadu" ->
/// "TN"), or the first two letters of a single word ("Goa" -> "GO").
fn derive_state_code(name: &str) -> String {
    let words: Vec<&str> = name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty() && !matches!(w.to_lowercase().as_str(), "and" | "of" | "the"))
        .collect();

    let code: String = if words.len() > 1 {
        words.iter().filter_map(|w| w.chars().next()).collect()
    } else {
        name.chars().filter(|c| c.is_alphanumeric()).take(2).collect()
    };
    code.to_uppercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
