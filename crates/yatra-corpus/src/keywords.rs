//! Keyword expansion for place types.
//!
//! Lets lexical search match related queries ("relaxing getaway" finds a
//! beach) without an embedding model.

/// Substrings of a lower-cased place type and the terms they contribute.
const TYPE_KEYWORDS: &[(&[&str], &[&str])] = &[
    (
        &["beach"],
        &["beach", "sea", "ocean", "coastal", "sand", "water", "swim", "relaxation"],
    ),
    (
        &["temple", "religious"],
        &["temple", "spiritual", "worship", "pilgrimage", "religious", "sacred", "prayer"],
    ),
    (
        &["fort", "palace", "historical"],
        &["heritage", "history", "historical", "architecture", "monument", "royal"],
    ),
    (
        &["hill", "mountain"],
        &["mountain", "hill", "trekking", "nature", "scenic", "cool", "adventure"],
    ),
    (
        &["wildlife", "sanctuary", "national park"],
        &["wildlife", "safari", "animals", "nature", "jungle", "forest"],
    ),
    (&["waterfall"], &["waterfall", "water", "nature", "scenic"]),
    (
        &["lake", "backwater"],
        &["lake", "water", "boating", "scenic", "peaceful", "relaxation"],
    ),
];

/// Expand a place type into extra search terms.
///
/// Every row whose pattern occurs in the type contributes its terms, in table
/// order. Returns an empty list for an unknown or missing type.
pub fn expand_type_keywords(kind: &str) -> Vec<&'static str> {
    let kind = kind.to_lowercase();
    if kind.is_empty() {
        return Vec::new();
    }

    TYPE_KEYWORDS
        .iter()
        .filter(|(patterns, _)| patterns.iter().any(|p| kind.contains(p)))
        .flat_map(|(_, terms)| terms.iter().copied())
        .collect()
}
