//! CLI - Command Line Interface for Cine-Rate
//!
//! Every listing the TUI shows, plus rating and wishlist edits, is
//! scriptable. Output is JSON when asked for or when stdout is not a TTY.
//!
//! # Examples
//!
//! ```bash
//! cinerate popular --limit 5
//! cinerate search "sci-fi" --json
//! cinerate info 157336
//! cinerate rate 157336 9
//! cinerate wishlist add 157336
//! ```

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::models::{MovieSummary, Rating};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Movie not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Cine-Rate - movie discovery with your own ratings and wishlist
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "cinerate",
    version,
    about = "Terminal movie discovery with local ratings and a wishlist",
    long_about = "Browse popular, top rated and trending movies from TMDB, \
                  search by title or genre, rate movies from 1 to 10 and \
                  keep a wishlist.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  cinerate                        Launch interactive TUI\n\
                  cinerate search horror          Horror movies (genre match)\n\
                  cinerate search \"blade runner\"  Title search\n\
                  cinerate rate 157336 9          Rate a movie 9/10\n\
                  cinerate wishlist --json        Wishlist as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Keep ratings and the wishlist in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Popular movies
    #[command(visible_alias = "p")]
    Popular(ListCmd),

    /// Today's trending movies
    #[command(visible_alias = "tr")]
    Trending(ListCmd),

    /// Top rated movies
    #[command(visible_alias = "top")]
    TopRated(ListCmd),

    /// Search by genre name or title
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// List catalog genres
    Genres,

    /// Details for one movie
    #[command(visible_alias = "i")]
    Info(MovieCmd),

    /// Movies similar to one movie
    Similar(RelatedCmd),

    /// TMDB recommendations for one movie
    #[command(visible_alias = "rec")]
    Recommendations(RelatedCmd),

    /// Rate a movie from 1 to 10
    Rate(RateCmd),

    /// Show or edit the wishlist
    #[command(visible_alias = "w")]
    Wishlist(WishlistCmd),

    /// Save a TMDB API key to the config file
    SetKey(SetKeyCmd),
}

// =============================================================================
// Listing Commands
// =============================================================================

/// Shared options for movie lists
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Genre names resolve to discovery, anything else is a title search
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Genre name or title
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct MovieCmd {
    /// TMDB movie id
    #[arg(required = true)]
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct RelatedCmd {
    /// TMDB movie id
    #[arg(required = true)]
    pub id: u64,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "12")]
    pub limit: usize,
}

// =============================================================================
// Preference Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct RateCmd {
    /// TMDB movie id
    #[arg(required = true)]
    pub id: u64,

    /// Rating, 1 to 10
    #[arg(required = true, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub value: u8,
}

impl RateCmd {
    pub fn rating(&self) -> Option<Rating> {
        Rating::new(self.value)
    }
}

#[derive(Args, Debug)]
pub struct WishlistCmd {
    /// Action to take (default: list)
    #[command(subcommand)]
    pub action: Option<WishlistAction>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    /// List wishlisted movies
    List {
        /// Print ids only, without fetching details
        #[arg(long)]
        ids: bool,
    },
    /// Add a movie
    Add { id: u64 },
    /// Remove a movie
    #[command(visible_alias = "rm")]
    Remove { id: u64 },
    /// Add if absent, remove if present
    Toggle { id: u64 },
}

impl WishlistCmd {
    pub fn action(&self) -> WishlistAction {
        self.action
            .clone()
            .unwrap_or(WishlistAction::List { ids: false })
    }
}

#[derive(Args, Debug)]
pub struct SetKeyCmd {
    /// TMDB v3 API key
    #[arg(required = true)]
    pub key: String,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Standard JSON response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    /// Response data (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Exit code
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// One movie row in list output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRow {
    pub id: u64,
    pub title: String,
    pub year: String,
    pub vote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_rating: Option<u8>,
    pub wishlisted: bool,
}

impl MovieRow {
    pub fn new(movie: &MovieSummary, rating: Option<Rating>, wishlisted: bool) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            year: movie.year_label().to_string(),
            vote: movie.vote_label(),
            your_rating: rating.map(Rating::get),
            wishlisted,
        }
    }
}

/// Result of a rating or wishlist edit
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PreferenceChange {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishlisted: Option<bool>,
    /// An add found the movie already wishlisted
    #[serde(default, skip_serializing_if = "is_false")]
    pub already_present: bool,
    pub wishlist_count: usize,
}

// =============================================================================
// Output Helper
// =============================================================================

/// Output helper for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data (JSON envelope or plain lines)
    pub fn print<T: Serialize>(&self, data: T, plain: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            let text = plain(&data);
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (only if not quiet and not JSON)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

/// "Title (2014)  ★ 8.4  [9/10] ❤" lines for a movie list
pub fn format_rows(rows: &[MovieRow]) -> String {
    rows.iter()
        .map(|row| {
            let mut line = format!("{:>8}  {} ({})  ★ {}", row.id, row.title, row.year, row.vote);
            if let Some(rating) = row.your_rating {
                line.push_str(&format!("  [{}/10]", rating));
            }
            if row.wishlisted {
                line.push_str("  ❤");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
