//! CLI Command Handlers
//!
//! Implements all CLI commands on top of the catalog client and the
//! preference store. Each handler takes CLI args, a [`Context`] and
//! [`Output`], and returns an [`ExitCode`].

use std::path::Path;

use serde::Serialize;

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    format_rows, ExitCode, ListCmd, MovieCmd, MovieRow, Output, PreferenceChange, RateCmd,
    RelatedCmd, SearchCmd, SetKeyCmd, WishlistAction, WishlistCmd,
};
use crate::config::{Config, ConfigError};
use crate::effects::fetch_wishlist;
use crate::genre::{self, Resolution};
use crate::models::{MovieDetail, MoviePage, MovieSummary};
use crate::store::{FileStore, MemoryStore, Preferences};

/// What every handler works against
#[derive(Debug)]
pub struct Context {
    pub client: TmdbClient,
    pub prefs: Preferences,
}

impl Context {
    pub fn new(client: TmdbClient, prefs: Preferences) -> Self {
        Self { client, prefs }
    }

    /// Client and preferences as configured. `ephemeral` keeps preferences
    /// in memory, leaving the store file untouched.
    pub fn from_config(config: &Config, ephemeral: bool) -> Result<Self, ConfigError> {
        let client = TmdbClient::with_base_url(config.api_key()?, config.api_base_url());
        let prefs = if ephemeral {
            tracing::info!("ephemeral session, preferences will not be saved");
            Preferences::new(MemoryStore::new())
        } else {
            Preferences::new(FileStore::open(config.store_path()))
        };
        Ok(Self::new(client, prefs))
    }

    fn rows<'a>(&self, movies: impl IntoIterator<Item = &'a MovieSummary>) -> Vec<MovieRow> {
        movies
            .into_iter()
            .map(|m| {
                MovieRow::new(
                    m,
                    self.prefs.get_rating(m.id),
                    self.prefs.is_wishlisted(m.id),
                )
            })
            .collect()
    }
}

fn print_or_fail<T: Serialize>(
    output: &Output,
    data: T,
    plain: impl FnOnce(&T) -> String,
) -> ExitCode {
    match output.print(data, plain) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

/// Print a page of movies, or fail with a network error when absent
fn print_page(ctx: &Context, page: Option<MoviePage>, limit: usize, output: &Output) -> ExitCode {
    let Some(page) = page else {
        return output.error(
            "Failed to load movies. Please try again later.",
            ExitCode::NetworkError,
        );
    };

    let rows = ctx.rows(page.results.iter().take(limit));
    if rows.is_empty() {
        output.info("No movies found.");
    }
    print_or_fail(output, rows, |rows| format_rows(rows))
}

// =============================================================================
// Listing Commands
// =============================================================================

pub async fn popular_cmd(cmd: ListCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Popular Movies");
    let page = ctx.client.get_popular().await;
    print_page(ctx, page, cmd.limit, output)
}

pub async fn trending_cmd(cmd: ListCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Trending Today");
    let page = ctx.client.get_trending().await;
    print_page(ctx, page, cmd.limit, output)
}

pub async fn top_rated_cmd(cmd: ListCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Top Rated Suggestions");
    let page = ctx.client.get_top_rated().await;
    print_page(ctx, page, cmd.limit, output)
}

/// Genre names go through discovery, anything else is a title search
pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    let page = match genre::resolve(query) {
        Resolution::Genre { id, name } => {
            output.info(format!("{} Movies", genre::display_name(&name)));
            ctx.client.discover_by_genre(id).await
        }
        Resolution::Title { text } => {
            output.info(format!("Search Results for \"{}\"", text));
            ctx.client.search_by_title(&text).await
        }
    };
    print_page(ctx, page, cmd.limit, output)
}

pub async fn genres_cmd(ctx: &Context, output: &Output) -> ExitCode {
    match ctx.client.get_genres().await {
        Some(genres) => print_or_fail(output, genres, |genres| {
            genres
                .iter()
                .map(|g| format!("{:>6}  {}", g.id, g.name))
                .collect::<Vec<_>>()
                .join("\n")
        }),
        None => output.error("Failed to load genres", ExitCode::NetworkError),
    }
}

// =============================================================================
// Single Movie Commands
// =============================================================================

/// `info` payload: the catalog record plus local preferences
#[derive(Debug, Serialize)]
pub struct MovieInfo {
    #[serde(flatten)]
    pub detail: MovieDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub your_rating: Option<u8>,
    pub wishlisted: bool,
}

fn format_info(info: &MovieInfo) -> String {
    let movie = &info.detail.summary;
    let your_rating = info
        .your_rating
        .map(|r| format!("{}/10", r))
        .unwrap_or_else(|| "Not rated".to_string());

    let mut lines = vec![
        movie.title.clone(),
        info.detail.meta_line(),
        format!("TMDB: {}  Your Rating: {}", movie.vote_label(), your_rating),
    ];
    if info.wishlisted {
        lines.push("❤️ In Wishlist".to_string());
    }
    lines.push(String::new());
    lines.push(movie.overview_or_default().to_string());
    lines.join("\n")
}

pub async fn info_cmd(cmd: MovieCmd, ctx: &Context, output: &Output) -> ExitCode {
    match ctx.client.try_get_details(cmd.id).await {
        Ok(detail) => {
            let info = MovieInfo {
                your_rating: ctx.prefs.get_rating(cmd.id).map(|r| r.get()),
                wishlisted: ctx.prefs.is_wishlisted(cmd.id),
                detail,
            };
            print_or_fail(output, info, format_info)
        }
        Err(TmdbError::NotFound) => {
            output.error(format!("Movie {} not found", cmd.id), ExitCode::NotFound)
        }
        Err(e) => output.error(format!("Movie info failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn similar_cmd(cmd: RelatedCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Movies Similar to Your Selection");
    let page = ctx.client.get_similar(cmd.id).await;
    print_page(ctx, page, cmd.limit, output)
}

pub async fn recommendations_cmd(cmd: RelatedCmd, ctx: &Context, output: &Output) -> ExitCode {
    output.info("Recommended for You");
    let page = ctx.client.get_recommendations(cmd.id).await;
    print_page(ctx, page, cmd.limit, output)
}

// =============================================================================
// Preference Commands
// =============================================================================

pub fn rate_cmd(cmd: RateCmd, ctx: &mut Context, output: &Output) -> ExitCode {
    let Some(rating) = cmd.rating() else {
        return output.error("Rating must be between 1 and 10", ExitCode::InvalidArgs);
    };

    ctx.prefs.set_rating(cmd.id, rating);
    let change = PreferenceChange {
        id: cmd.id,
        rating: Some(rating.get()),
        wishlisted: None,
        already_present: false,
        wishlist_count: ctx.prefs.wishlist_count(),
    };
    print_or_fail(output, change, |c| {
        format!("You rated this movie {}/10!", c.rating.unwrap_or_default())
    })
}

/// Apply a wishlist edit. `List` is not an edit and returns `None`.
pub fn edit_wishlist(prefs: &mut Preferences, action: &WishlistAction) -> Option<PreferenceChange> {
    let (id, wishlisted, already_present) = match *action {
        WishlistAction::List { .. } => return None,
        WishlistAction::Add { id } => {
            let added = prefs.add_to_wishlist(id);
            (id, true, !added)
        }
        WishlistAction::Remove { id } => {
            prefs.remove_from_wishlist(id);
            (id, false, false)
        }
        WishlistAction::Toggle { id } => (id, prefs.toggle_wishlist(id), false),
    };

    Some(PreferenceChange {
        id,
        rating: None,
        wishlisted: Some(wishlisted),
        already_present,
        wishlist_count: prefs.wishlist_count(),
    })
}

fn format_wishlist_change(change: &PreferenceChange) -> String {
    let verb = if change.already_present {
        "Already in your wishlist!"
    } else if change.wishlisted == Some(true) {
        "Added to wishlist! ❤️"
    } else {
        "Removed from wishlist"
    };
    format!("{} ({} in wishlist)", verb, change.wishlist_count)
}

pub async fn wishlist_cmd(cmd: WishlistCmd, ctx: &mut Context, output: &Output) -> ExitCode {
    let action = cmd.action();
    if let WishlistAction::List { ids } = action {
        return wishlist_list(ids, ctx, output).await;
    }

    match edit_wishlist(&mut ctx.prefs, &action) {
        Some(change) => print_or_fail(output, change, format_wishlist_change),
        None => ExitCode::Success,
    }
}

async fn wishlist_list(ids_only: bool, ctx: &Context, output: &Output) -> ExitCode {
    let ids = ctx.prefs.get_wishlist();
    output.info(format!("My Wishlist ({})", ids.len()));

    if ids_only {
        return print_or_fail(output, ids, |ids| {
            ids.iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        });
    }

    if ids.is_empty() {
        output.info("💔 Your wishlist is empty");
        return print_or_fail(output, Vec::<MovieRow>::new(), |_| String::new());
    }

    let movies = fetch_wishlist(&ctx.client, &ids).await;
    if movies.is_empty() {
        return output.error("Failed to load wishlist movies.", ExitCode::NetworkError);
    }

    let rows = ctx.rows(movies.iter().map(|d| &d.summary));
    print_or_fail(output, rows, |rows| format_rows(rows))
}

// =============================================================================
// Config Commands
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SavedConfig {
    pub path: String,
}

/// Store the API key in the config file at `path`, keeping other settings
pub fn set_key_cmd(
    cmd: SetKeyCmd,
    mut config: Config,
    path: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let key = cmd.key.trim();
    if key.is_empty() {
        return output.error("API key is empty", ExitCode::InvalidArgs);
    }
    let Some(path) = path else {
        return output.error(
            "No config directory found; pass --config <path>",
            ExitCode::Error,
        );
    };

    config.tmdb_api_key = Some(key.to_string());
    match config.save_to(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "API key saved");
            let saved = SavedConfig {
                path: path.display().to_string(),
            };
            print_or_fail(output, saved, |s| format!("API key saved to {}", s.path))
        }
        Err(e) => output.error(format!("Failed to save config: {:#}", e), ExitCode::Error),
    }
}
