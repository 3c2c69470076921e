//! Network work requested by the controller
//!
//! `App` never talks to the catalog directly. It returns [`Effect`]s, which
//! are executed here (inline in tests and the CLI, on spawned tasks in the
//! TUI) and fed back to `App::apply` as [`Completion`]s.

use futures::future::join_all;

use crate::api::TmdbClient;
use crate::app::GridView;
use crate::models::{Genre, MovieDetail, MoviePage};

/// A grid load, tagged with its sequence number
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub seq: u64,
    pub view: GridView,
    /// Ids to fetch for the wishlist view
    pub wishlist: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Trending list for the hero panel
    Hero,
    /// Catalog genre list (background)
    Genres,
    Grid(GridRequest),
    Detail { seq: u64, movie_id: u64 },
}

/// Result of a grid request
#[derive(Debug, Clone, PartialEq)]
pub enum GridOutcome {
    /// `None` when the request failed
    Page(Option<MoviePage>),
    /// Wishlist batch: how many were requested and which arrived
    Wishlist {
        requested: usize,
        movies: Vec<MovieDetail>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Hero(Option<MoviePage>),
    Genres(Option<Vec<Genre>>),
    Grid {
        seq: u64,
        view: GridView,
        outcome: GridOutcome,
    },
    Detail {
        seq: u64,
        movie_id: u64,
        detail: Option<MovieDetail>,
    },
}

/// Run one effect against the catalog
pub async fn execute(client: &TmdbClient, effect: Effect) -> Completion {
    match effect {
        Effect::Hero => Completion::Hero(client.get_trending().await),
        Effect::Genres => Completion::Genres(client.get_genres().await),
        Effect::Detail { seq, movie_id } => Completion::Detail {
            seq,
            movie_id,
            detail: client.get_details(movie_id).await,
        },
        Effect::Grid(request) => {
            let outcome = load_grid(client, &request).await;
            Completion::Grid {
                seq: request.seq,
                view: request.view,
                outcome,
            }
        }
    }
}

async fn load_grid(client: &TmdbClient, request: &GridRequest) -> GridOutcome {
    let page = match &request.view {
        GridView::Popular => client.get_popular().await,
        GridView::TopRated => client.get_top_rated().await,
        GridView::Genre { id, .. } => client.discover_by_genre(*id).await,
        GridView::Search(query) => client.search_by_title(query).await,
        GridView::Similar(id) => client.get_similar(*id).await,
        GridView::Wishlist => {
            return GridOutcome::Wishlist {
                requested: request.wishlist.len(),
                movies: fetch_wishlist(client, &request.wishlist).await,
            }
        }
    };
    GridOutcome::Page(page)
}

/// One detail request per id, all awaited together. Failures are dropped.
pub async fn fetch_wishlist(client: &TmdbClient, ids: &[u64]) -> Vec<MovieDetail> {
    let results = join_all(ids.iter().map(|&id| client.get_details(id))).await;
    let movies: Vec<MovieDetail> = results.into_iter().flatten().collect();

    if movies.len() < ids.len() {
        tracing::warn!(
            requested = ids.len(),
            loaded = movies.len(),
            "some wishlist movies failed to load"
        );
    }
    movies
}
