//! End-to-end flow tests for Cine-Rate
//!
//! Drives the controller through user actions against a mocked catalog and
//! checks the resulting document: browse, search, detail, rate, wishlist.

use std::time::Instant;

use cinerate::action::{Action, NavTarget, ToggleOrigin};
use cinerate::api::TmdbClient;
use cinerate::app::{App, GridView, InputMode};
use cinerate::store::{MemoryStore, Preferences};
use cinerate::view::{CardKind, Grid, Modal};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;

// =============================================================================
// Fixtures
// =============================================================================

fn movie_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Movie {}", id),
        "release_date": "2021-06-01",
        "overview": format!("Overview of movie {}", id),
        "poster_path": format!("/poster{}.jpg", id),
        "backdrop_path": format!("/backdrop{}.jpg", id),
        "vote_average": 7.5
    })
}

fn page_body(ids: impl IntoIterator<Item = u64>) -> String {
    let results: Vec<_> = ids.into_iter().map(movie_json).collect();
    json!({
        "page": 1,
        "total_pages": 1,
        "total_results": results.len(),
        "results": results
    })
    .to_string()
}

fn detail_body(id: u64) -> String {
    let mut detail = movie_json(id);
    detail["runtime"] = json!(118);
    detail["genres"] = json!([{ "id": 28, "name": "Action" }]);
    detail.to_string()
}

async fn mock_get(server: &mut ServerGuard, path: &str, body: String) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn setup(server: &ServerGuard) -> (App, TmdbClient) {
    let app = App::new(Preferences::new(MemoryStore::new()));
    let client = TmdbClient::with_base_url("test_key", server.url());
    (app, client)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn card_ids(app: &App) -> Vec<u64> {
    app.document.grid.cards().iter().map(|c| c.movie_id()).collect()
}

fn notification(app: &App) -> Option<&str> {
    app.document.notification().map(|n| n.message.as_str())
}

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn test_start_loads_hero_grid_and_genres() {
    let mut server = Server::new_async().await;
    let _trending = mock_get(&mut server, "/trending/movie/day", page_body([900, 901])).await;
    let _popular = mock_get(&mut server, "/movie/popular", page_body(1..=4)).await;
    let _genres = mock_get(
        &mut server,
        "/genre/movie/list",
        r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]}"#.into(),
    )
    .await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Start).await;

    assert_eq!(app.hero_movie().map(|m| m.id), Some(900));
    let hero = app.document.hero.as_ref().expect("hero rendered");
    assert!(hero.text_content().contains("#1 Trending Today"));
    assert!(hero.text_content().contains("Cine-Rate: N/A"));

    assert_eq!(app.document.section_title, "Popular Movies");
    assert_eq!(card_ids(&app), vec![1, 2, 3, 4]);
    assert_eq!(app.genres().len(), 2);
    assert_eq!(app.document.wishlist_count, 0);
}

#[tokio::test]
async fn test_failed_listing_shows_error_state() {
    let mut server = Server::new_async().await;
    let _popular = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Navigate(NavTarget::Movies)).await;

    assert_eq!(
        app.document.grid,
        Grid::Failed("Failed to load movies. Please try again later.".into())
    );
}

#[tokio::test]
async fn test_navigation_switches_listing() {
    let mut server = Server::new_async().await;
    let _top = mock_get(&mut server, "/movie/top_rated", page_body([50, 51])).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Navigate(NavTarget::Suggestions))
        .await;

    assert_eq!(app.view, GridView::TopRated);
    assert_eq!(app.document.section_title, "Top Rated Suggestions");
    assert_eq!(card_ids(&app), vec![50, 51]);
}

#[tokio::test]
async fn test_out_of_order_responses_keep_latest_view() {
    let mut server = Server::new_async().await;
    let _top = mock_get(&mut server, "/movie/top_rated", page_body([50])).await;
    let _popular = mock_get(&mut server, "/movie/popular", page_body([1, 2])).await;

    let (mut app, client) = setup(&server);
    let now = Instant::now();
    let older = app.handle_action(Action::Navigate(NavTarget::Suggestions), now);
    let newer = app.handle_action(Action::Navigate(NavTarget::Movies), now);

    // Newest finishes first, then the slow older request lands
    app.run_effects(&client, newer).await;
    app.run_effects(&client, older).await;

    assert_eq!(app.document.section_title, "Popular Movies");
    assert_eq!(card_ids(&app), vec![1, 2]);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_genre_word_uses_discovery_only() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let discover = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_genres".into(), "28".into()),
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
        ]))
        .with_status(200)
        .with_body(page_body([10, 11, 12]))
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    let now = Instant::now();

    app.handle_key(key(KeyCode::Char('/')), now);
    for c in "Action".chars() {
        app.handle_key(key(KeyCode::Char(c)), now);
    }
    let effects = app.handle_key(key(KeyCode::Enter), now);
    app.run_effects(&client, effects).await;

    discover.assert_async().await;
    search.assert_async().await;

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.document.section_title, "Action Movies");
    assert_eq!(card_ids(&app), vec![10, 11, 12]);
    assert_eq!(notification(&app), Some("Found 3 action movies!"));
}

#[tokio::test]
async fn test_title_search_uses_search_endpoint() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "blade runner".into()))
        .with_status(200)
        .with_body(page_body([78]))
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    app.search.query = "  blade runner ".into();
    app.perform(&client, Action::SubmitSearch).await;

    search.assert_async().await;
    assert_eq!(app.document.section_title, "Search Results for \"blade runner\"");
    assert_eq!(card_ids(&app), vec![78]);
}

#[tokio::test]
async fn test_search_with_no_results_shows_hint() {
    let mut server = Server::new_async().await;
    let _search = mock_get(&mut server, "/search/movie", page_body([])).await;

    let (mut app, client) = setup(&server);
    app.search.query = "zzzzqqq".into();
    app.perform(&client, Action::SubmitSearch).await;

    assert_eq!(
        app.document.grid.message(),
        Some("No movies found. Try a different search term.")
    );
}

// =============================================================================
// Detail, Rating, Similar
// =============================================================================

#[tokio::test]
async fn test_second_detail_replaces_first() {
    let mut server = Server::new_async().await;
    let _one = mock_get(&mut server, "/movie/1", detail_body(1)).await;
    let _two = mock_get(&mut server, "/movie/2", detail_body(2)).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::OpenDetail(1)).await;
    assert_eq!(app.document.modal().and_then(Modal::movie_id), Some(1));
    assert!(app.document.is_scroll_locked());

    app.perform(&client, Action::OpenDetail(2)).await;
    let modal = app.document.modal().expect("modal open");
    assert_eq!(modal.movie_id(), Some(2));
    assert!(modal.node().text_content().contains("Movie 2"));

    app.perform(&client, Action::CloseModal).await;
    assert!(app.document.modal().is_none());
    assert!(!app.document.is_scroll_locked());
}

#[tokio::test]
async fn test_failed_detail_notifies() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/movie/404")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::OpenDetail(404)).await;

    assert!(app.document.modal().is_none());
    assert_eq!(notification(&app), Some("Could not load movie details."));
}

#[tokio::test]
async fn test_rating_updates_open_modal() {
    let mut server = Server::new_async().await;
    let _detail = mock_get(&mut server, "/movie/5", detail_body(5)).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::OpenDetail(5)).await;
    app.perform(
        &client,
        Action::Rate {
            movie_id: 5,
            value: 7,
        },
    )
    .await;

    let node = app.document.modal().expect("modal open").node();
    let filled = node
        .rating_stars()
        .expect("stars")
        .iter()
        .filter(|s| s.filled)
        .count();
    assert_eq!(filled, 7);
    assert!(node.text_content().contains("Your Rating: 7/10"));
    assert_eq!(notification(&app), Some("You rated this movie 7/10!"));
    assert_eq!(app.prefs().get_rating(5).map(|r| r.get()), Some(7));
}

#[tokio::test]
async fn test_similar_closes_modal_and_caps_results() {
    let mut server = Server::new_async().await;
    let _detail = mock_get(&mut server, "/movie/3", detail_body(3)).await;
    let _similar = mock_get(&mut server, "/movie/3/similar", page_body(100..120)).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::OpenDetail(3)).await;
    app.perform(&client, Action::FindSimilar(3)).await;

    assert!(app.document.modal().is_none());
    assert_eq!(app.document.section_title, "Movies Similar to Your Selection");
    assert_eq!(app.document.grid.cards().len(), 12);
    assert_eq!(card_ids(&app)[0], 100);
    assert_eq!(
        notification(&app),
        Some("Here are some similar movies you might enjoy!")
    );
}

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_empty_wishlist_needs_no_requests() {
    let mut server = Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Navigate(NavTarget::Wishlist)).await;

    any.assert_async().await;
    assert_eq!(app.document.section_title, "My Wishlist (0)");
    assert!(app.document.grid.cards().is_empty());
    assert_eq!(app.document.grid.message(), Some("💔 Your wishlist is empty"));
}

#[tokio::test]
async fn test_adding_while_viewing_wishlist_reloads_it() {
    let mut server = Server::new_async().await;
    let _detail = mock_get(&mut server, "/movie/42", detail_body(42)).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Navigate(NavTarget::Wishlist)).await;
    app.perform(
        &client,
        Action::ToggleWishlist {
            movie_id: 42,
            origin: ToggleOrigin::Modal,
        },
    )
    .await;

    assert_eq!(app.document.wishlist_count, 1);
    assert_eq!(app.document.section_title, "My Wishlist (1)");
    assert_eq!(card_ids(&app), vec![42]);
    assert_eq!(app.document.grid.cards()[0].kind, CardKind::Wishlist);

    // Removing from the wishlist view drops the card again
    app.perform(&client, Action::RemoveFromWishlist(42)).await;
    assert_eq!(app.document.wishlist_count, 0);
    assert!(app.document.grid.cards().is_empty());
    assert_eq!(notification(&app), Some("Removed from wishlist"));
}

#[tokio::test]
async fn test_wishlist_fetch_failure_shows_error() {
    let mut server = Server::new_async().await;
    let _detail = server
        .mock("GET", "/movie/42")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    app.perform(
        &client,
        Action::ToggleWishlist {
            movie_id: 42,
            origin: ToggleOrigin::Card,
        },
    )
    .await;
    app.perform(&client, Action::Navigate(NavTarget::Wishlist)).await;

    assert_eq!(
        app.document.grid,
        Grid::Failed("Failed to load wishlist movies.".into())
    );
}

#[tokio::test]
async fn test_wishlist_partial_failure_shows_survivors() {
    let mut server = Server::new_async().await;
    let _found = mock_get(&mut server, "/movie/42", detail_body(42)).await;
    let _broken = server
        .mock("GET", "/movie/43")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let (mut app, client) = setup(&server);
    for movie_id in [42, 43] {
        app.perform(
            &client,
            Action::ToggleWishlist {
                movie_id,
                origin: ToggleOrigin::Card,
            },
        )
        .await;
    }
    app.perform(&client, Action::Navigate(NavTarget::Wishlist)).await;

    // The title counts stored ids, the grid only what arrived
    assert_eq!(app.document.section_title, "My Wishlist (2)");
    assert_eq!(card_ids(&app), vec![42]);
    assert_eq!(app.document.grid.cards()[0].kind, CardKind::Wishlist);
    assert_eq!(app.prefs().get_wishlist(), vec![42, 43]);
}

#[tokio::test]
async fn test_wishlist_toggle_updates_card_heart() {
    let mut server = Server::new_async().await;
    let _popular = mock_get(&mut server, "/movie/popular", page_body([7, 8])).await;

    let (mut app, client) = setup(&server);
    app.perform(&client, Action::Navigate(NavTarget::Movies)).await;

    let toggle = Action::ToggleWishlist {
        movie_id: 8,
        origin: ToggleOrigin::Card,
    };
    app.perform(&client, toggle.clone()).await;

    let card = &app.document.grid.cards()[1];
    assert_eq!(card.node.find_button(&toggle), Some(("❤️", true)));
    assert_eq!(notification(&app), Some("Added to wishlist! ❤️"));
    assert_eq!(app.prefs().get_wishlist(), vec![8]);
}
