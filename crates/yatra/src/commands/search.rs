//! Search for places

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::common::open_search;

pub async fn search(
    query: &str,
    dataset: Option<PathBuf>,
    limit: usize,
    destination: Option<String>,
    json: bool,
) -> Result<()> {
    let engine = open_search(dataset)?;
    let results = engine.search_with_timing(query, limit, destination.as_deref());

    if json {
        let output = serde_json::to_string_pretty(&results).context("Failed to encode results")?;
        println!("{}", output);
        return Ok(());
    }

    println!(
        "Search results for '{}' ({} ms, {} search)",
        query, results.search_time_ms, results.mode
    );
    println!("Found {} results\n", results.total_count);

    for result in &results.results {
        let place = &result.place;
        println!("📍 {} (score: {:.2})", place.name, result.score);
        if let Some(ref kind) = place.kind {
            println!("   Type: {}", kind);
        }
        if place.location.is_empty() {
            println!("   {} ({})", place.state, place.state_code);
        } else {
            println!("   {}, {} ({})", place.location, place.state, place.state_code);
        }
        println!();
    }

    Ok(())
}
