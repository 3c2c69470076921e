//! TMDB (The Movie Database) catalog client
//!
//! Read-only listing, search, discovery and detail lookups.
//! API docs: https://developer.themoviedb.org/docs
//!
//! Every public call returns `Option`: transport, status and parse failures
//! are logged here and never reach the caller as errors. `None` therefore
//! means "the request failed", while `Some(page)` with no results means
//! "the catalog answered with nothing".

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{Genre, GenreList, MovieDetail, MoviePage};

/// Default TMDB v3 endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("API key rejected ({0})")]
    Unauthorized(u16),

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (proxies, testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One GET with the API key appended to the query string. No retries.
    async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| TmdbError::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(TmdbError::Unauthorized(status.as_u16()))
            }
            status => Err(TmdbError::ServerError(status.as_u16())),
        }
    }

    /// Collapse failures to `None`, logging them
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Option<T> {
        tracing::debug!(endpoint, "catalog request");
        match self.request(endpoint).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(endpoint, error = %e, "catalog request failed");
                None
            }
        }
    }

    /// Today's trending movies
    pub async fn get_trending(&self) -> Option<MoviePage> {
        self.fetch("/trending/movie/day").await
    }

    /// Popular movies (the default grid)
    pub async fn get_popular(&self) -> Option<MoviePage> {
        self.fetch("/movie/popular").await
    }

    /// Top rated movies ("Suggestions")
    pub async fn get_top_rated(&self) -> Option<MoviePage> {
        self.fetch("/movie/top_rated").await
    }

    /// Free-text title search. A blank query issues no request.
    pub async fn search_by_title(&self, query: &str) -> Option<MoviePage> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let endpoint = format!("/search/movie?query={}", urlencoding::encode(query));
        self.fetch(&endpoint).await
    }

    /// The catalog's genre list
    pub async fn get_genres(&self) -> Option<Vec<Genre>> {
        self.fetch::<GenreList>("/genre/movie/list")
            .await
            .map(|list| list.genres)
    }

    /// Movies of one genre, most popular first
    pub async fn discover_by_genre(&self, genre_id: u32) -> Option<MoviePage> {
        let endpoint = format!(
            "/discover/movie?with_genres={}&sort_by=popularity.desc",
            genre_id
        );
        self.fetch(&endpoint).await
    }

    /// Full record for one movie
    pub async fn get_details(&self, id: u64) -> Option<MovieDetail> {
        self.fetch(&format!("/movie/{}", id)).await
    }

    /// Like [`get_details`](Self::get_details) but keeps the error, so a
    /// missing movie can be told apart from a failed request
    pub async fn try_get_details(&self, id: u64) -> Result<MovieDetail, TmdbError> {
        self.request(&format!("/movie/{}", id)).await
    }

    /// Movies similar to `id`
    pub async fn get_similar(&self, id: u64) -> Option<MoviePage> {
        self.fetch(&format!("/movie/{}/similar", id)).await
    }

    /// TMDB recommendations for `id`
    pub async fn get_recommendations(&self, id: u64) -> Option<MoviePage> {
        self.fetch(&format!("/movie/{}/recommendations", id)).await
    }
}
