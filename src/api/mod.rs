//! API clients for external services
//!
//! - TMDB: movie listings, search, discovery and details

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
