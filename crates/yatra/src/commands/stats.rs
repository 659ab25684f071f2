//! Show corpus and index statistics

use anyhow::Result;
use std::path::PathBuf;

use super::common::open_search;

pub async fn stats(dataset: Option<PathBuf>) -> Result<()> {
    let engine = open_search(dataset)?;
    let capabilities = engine.initialize();
    let stats = engine.stats();

    println!("Yatra Search Statistics");
    println!("=======================");
    match &engine.config().dataset {
        Some(path) => println!("Dataset: {:?}", path),
        None => println!("Dataset: bundled"),
    }
    println!();
    println!("Corpus:");
    println!("  Places: {}", stats.total_places);
    println!();
    println!("Retrieval:");
    println!("  Mode: {}", stats.search_mode);
    println!(
        "  Embedding model: {}",
        if capabilities.embedding_available { "loaded" } else { "unavailable" }
    );
    println!("  Indexed vectors: {}", stats.index_size);

    Ok(())
}
