//! Geographic dataset schema and sources.

use crate::error::CorpusError;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Indian states dataset shipped with the crate.
const BUNDLED_DATASET: &str = include_str!("../data/india.json");

const STATES_KEY: &str = "states";
const TERRITORIES_KEY: &str = "unionTerritories";

/// One state or union territory.
///
/// Every field is optional on the wire. A scalar of the wrong type reads as
/// absent, and malformed entries inside `famousFor`/`touristAttractions` are
/// dropped instead of failing the region.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Region {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub capital: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub famous_for: Vec<String>,
    #[serde(deserialize_with = "lenient_vec")]
    pub tourist_attractions: Vec<Attraction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attraction {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub district: Option<String>,
}

impl Attraction {
    /// City if present, otherwise district, otherwise empty.
    pub fn location(&self) -> &str {
        self.city
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .or(self.district.as_deref())
            .unwrap_or("")
    }
}

/// Read access to a geographic dataset.
pub trait PlaceSource: Send + Sync {
    /// All top-level regions (states) with their attractions.
    fn states(&self) -> Result<Vec<Region>, CorpusError>;

    /// All subordinate territories with their attractions.
    fn territories(&self) -> Result<Vec<Region>, CorpusError>;
}

/// A source with no regions at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl PlaceSource for EmptySource {
    fn states(&self) -> Result<Vec<Region>, CorpusError> {
        Ok(Vec::new())
    }

    fn territories(&self) -> Result<Vec<Region>, CorpusError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone)]
enum Origin {
    File(PathBuf),
    Inline(Cow<'static, str>),
}

/// JSON dataset of the form `{ "states": [...], "unionTerritories": [...] }`.
///
/// The document is read when a section is requested, so a missing file shows
/// up as a load error rather than a construction error.
#[derive(Debug, Clone)]
pub struct JsonDataset {
    origin: Origin,
}

impl JsonDataset {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }

    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            origin: Origin::Inline(Cow::Owned(json.into())),
        }
    }

    /// The dataset embedded in this crate.
    pub fn bundled() -> Self {
        Self {
            origin: Origin::Inline(Cow::Borrowed(BUNDLED_DATASET)),
        }
    }

    fn document(&self) -> Result<Value, CorpusError> {
        let text = match &self.origin {
            Origin::File(path) => Cow::Owned(fs::read_to_string(path).map_err(|source| {
                CorpusError::Io {
                    path: path.clone(),
                    source,
                }
            })?),
            Origin::Inline(text) => Cow::Borrowed(text.as_ref()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    fn section(&self, key: &'static str) -> Result<Vec<Region>, CorpusError> {
        let mut document = self.document()?;
        let entries = match document.get_mut(key).map(Value::take) {
            None | Some(Value::Null) => {
                debug!(section = key, "Dataset section missing, treating as empty");
                return Ok(Vec::new());
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(CorpusError::NotAList(key)),
        };

        let regions = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match serde_json::from_value::<Region>(entry) {
                Ok(region) => Some(region),
                Err(e) => {
                    warn!(section = key, index = i, "Skipping malformed region: {}", e);
                    None
                }
            })
            .collect();

        Ok(regions)
    }
}

impl PlaceSource for JsonDataset {
    fn states(&self) -> Result<Vec<Region>, CorpusError> {
        self.section(STATES_KEY)
    }

    fn territories(&self) -> Result<Vec<Region>, CorpusError> {
        self.section(TERRITORIES_KEY)
    }
}

/// Deserialize a list, keeping only the elements that parse as `T`.
/// A missing, null or non-list value becomes an empty list.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Deserialize an optional string; any other JSON type reads as `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}
