//! Searchable corpus of tourist places.
//!
//! Loads a geographic dataset (states and union territories with their
//! attractions) and flattens it into [`PlaceRecord`]s whose `search_text`
//! carries the keyword expansion used by lexical search.

pub mod builder;
pub mod dataset;
pub mod error;
pub mod keywords;

pub use builder::{CorpusBuilder, DEFAULT_REGION, PlaceRecord, build_records};
pub use dataset::{Attraction, EmptySource, JsonDataset, PlaceSource, Region};
pub use error::CorpusError;
pub use keywords::expand_type_keywords;
