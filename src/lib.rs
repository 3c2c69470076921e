//! Cine-Rate - terminal movie discovery
//!
//! Browse TMDB listings, search by title or genre, rate movies from 1 to 10
//! and keep a wishlist stored locally.
//!
//! # Modules
//!
//! - `models` - Catalog payloads and the `Rating` type
//! - `api` - TMDB catalog client
//! - `store` - Key-value persistence and user preferences
//! - `genre` - Free-text genre resolution
//! - `view` - Node trees and the displayed document
//! - `app` - Controller state machine and input handling
//! - `effects` - Catalog requests issued by the controller
//! - `ui` - Terminal painting
//! - `cli` / `commands` - Scriptable subcommands

pub mod action;
pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod effects;
pub mod genre;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use models::{Genre, MovieDetail, MoviePage, MovieSummary, Rating};

pub use api::{TmdbClient, TmdbError};
pub use app::{App, GridView};
pub use store::Preferences;
