//! CLI command implementations for Yatra

mod common;
mod places;
mod search;
mod serve;
mod stats;

pub use places::places;
pub use search::search;
pub use serve::serve;
pub use stats::stats;
