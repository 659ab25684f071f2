//! List the places of one state

use anyhow::Result;
use std::path::PathBuf;

use super::common::open_search;

pub async fn places(state: &str, dataset: Option<PathBuf>) -> Result<()> {
    let engine = open_search(dataset)?;
    let places = engine.places_by_state(state);

    if places.is_empty() {
        println!("No places found for '{}'", state);
        return Ok(());
    }

    println!("{} places in '{}'\n", places.len(), state);
    for place in &places {
        let kind = place.kind.as_deref().unwrap_or("Place");
        if place.location.is_empty() {
            println!("  {} [{}] - {}", place.name, kind, place.state);
        } else {
            println!("  {} [{}] - {}, {}", place.name, kind, place.location, place.state);
        }
    }

    Ok(())
}
