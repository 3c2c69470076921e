//! Data structures shared across CineRate
//!
//! - **Catalog**: movie summaries, details and listing pages as TMDB returns them
//! - **Preferences**: the user's 1-10 Cine-Rating

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default TMDB image CDN
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Shown wherever a movie has no poster
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/300x450?text=No+Poster";

/// Text used for any missing optional field
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// A movie as it appears in listing endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Year portion of the release date, `None` when the date is missing or blank
    pub fn release_year(&self) -> Option<&str> {
        release_year(self.release_date.as_deref())
    }

    /// Year for display, "N/A" when unknown
    pub fn year_label(&self) -> &str {
        self.release_year().unwrap_or(NOT_AVAILABLE)
    }

    /// Audience score formatted to one decimal, "N/A" when TMDB has none.
    ///
    /// TMDB reports unrated titles as `0`, which is treated as missing.
    pub fn vote_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Overview text, with a fallback for empty descriptions
    pub fn overview_or_default(&self) -> &str {
        match self.overview.as_deref() {
            Some(o) if !o.trim().is_empty() => o,
            _ => "No description available.",
        }
    }

    /// Full poster URL (w500), or the placeholder image
    pub fn poster_url(&self, image_base: &str) -> String {
        match self.poster_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}/w500{}", image_base, path),
            _ => PLACEHOLDER_POSTER.to_string(),
        }
    }

    /// Full backdrop URL (original size), if the movie has one
    pub fn backdrop_url(&self, image_base: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|path| format!("{}/original{}", image_base, path))
    }
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) ★ {} [#{}]",
            self.title,
            self.year_label(),
            self.vote_label(),
            self.id
        )
    }
}

/// Genre as returned by TMDB
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Full movie record from `/movie/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Minutes
    #[serde(default)]
    pub runtime: Option<u32>,
}

impl MovieDetail {
    pub fn id(&self) -> u64 {
        self.summary.id
    }

    /// Genre names joined with ", ", "N/A" when there are none
    pub fn genres_label(&self) -> String {
        if self.genres.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            self.genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Runtime as `XhYm`, "N/A" when missing or zero
    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(minutes) if minutes > 0 => format!("{}h {}m", minutes / 60, minutes % 60),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// `year • genres • runtime`
    pub fn meta_line(&self) -> String {
        format!(
            "{} • {} • {}",
            self.summary.year_label(),
            self.genres_label(),
            self.runtime_label()
        )
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.summary.title, self.meta_line())
    }
}

/// Listing payload (popular, search, discover, similar...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

/// Payload of `/genre/movie/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

/// Portion of a release date before the first `-`
pub fn release_year(date: Option<&str>) -> Option<&str> {
    let date = date?.trim();
    let year = date.split('-').next().unwrap_or_default();
    if year.is_empty() {
        None
    } else {
        Some(year)
    }
}

// =============================================================================
// Preference Models
// =============================================================================

/// A user's Cine-Rating, always within 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Returns `None` outside 1..=10
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating {} is outside 1..=10", value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
