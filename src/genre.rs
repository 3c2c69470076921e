//! Genre resolution for free-text search input
//!
//! Decides whether what the user typed names a genre ("horror", "sci-fi",
//! "some action") or is a movie title.

use serde::Serialize;

/// Lowercase genre names (with synonyms) to TMDB genre ids.
///
/// Order matters: substring matching returns the first entry that fits.
pub const GENRE_TABLE: &[(&str, u32)] = &[
    ("action", 28),
    ("adventure", 12),
    ("animation", 16),
    ("comedy", 35),
    ("crime", 80),
    ("documentary", 99),
    ("drama", 18),
    ("family", 10751),
    ("fantasy", 14),
    ("history", 36),
    ("horror", 27),
    ("music", 10402),
    ("mystery", 9648),
    ("romance", 10749),
    ("science fiction", 878),
    ("sci-fi", 878),
    ("thriller", 53),
    ("war", 10752),
    ("western", 37),
];

/// Genres offered as one-key filters in the genre bar
pub const QUICK_GENRES: &[&str] = &[
    "action",
    "comedy",
    "drama",
    "horror",
    "romance",
    "sci-fi",
    "thriller",
    "animation",
];

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolution {
    /// Input names a genre; `name` is the matching table key
    Genre { id: u32, name: String },
    /// Plain title search with the trimmed input
    Title { text: String },
}

/// Map user input to a genre or a title search.
///
/// 1. exact (case-insensitive) match on a table key
/// 2. first key contained in the query, or containing it
/// 3. otherwise a title search
///
/// Callers short-circuit blank input before resolving; a blank query
/// resolves to an empty title search.
pub fn resolve(query: &str) -> Resolution {
    let text = query.trim();
    let lower = text.to_lowercase();

    if lower.is_empty() {
        return Resolution::Title {
            text: String::new(),
        };
    }

    if let Some(id) = genre_id(&lower) {
        return Resolution::Genre { id, name: lower };
    }

    let partial = GENRE_TABLE
        .iter()
        .find(|(name, _)| lower.contains(name) || name.contains(lower.as_str()));

    match partial {
        Some((name, id)) => Resolution::Genre {
            id: *id,
            name: name.to_string(),
        },
        None => Resolution::Title {
            text: text.to_string(),
        },
    }
}

/// Exact table lookup (case-insensitive)
pub fn genre_id(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    GENRE_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, id)| *id)
}

/// "sci-fi" -> "Sci-fi"
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Table keys in alphabetical order, for the genre picker
pub fn sorted_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = GENRE_TABLE.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}
