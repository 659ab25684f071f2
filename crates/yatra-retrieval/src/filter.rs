//! Destination (state) filter.

/// Normalize a caller-supplied destination: blank means no filter.
pub fn normalize_destination(destination: Option<&str>) -> Option<String> {
    destination
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_lowercase)
}

/// Bidirectional, case-insensitive containment between a place's state and a
/// lower-cased destination. "Kerala" matches "kerala" and also
/// "kerala backwaters trip".
pub fn matches_state(state: &str, destination: &str) -> bool {
    let state = state.to_lowercase();
    if state.is_empty() {
        return false;
    }
    state.contains(destination) || destination.contains(&state)
}
