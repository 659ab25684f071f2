pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod lexical;
pub mod results;

pub use config::SearchConfig;
pub use engine::{
    BootstrapState, CapabilitySet, MAX_SEARCH_LIMIT, PlaceSearch, PlaceSearchBuilder, SearchStats,
};
pub use error::SearchError;
pub use lexical::LexicalScorer;
pub use results::{SearchMode, SearchResult, SearchResults};
