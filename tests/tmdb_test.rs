//! TMDB catalog client tests
//!
//! Tests endpoint paths, query parameters, payload parsing and the
//! failure-as-absence contract.

use mockito::{Matcher, Server};
use cinerate::api::{TmdbClient, TmdbError};

const PAGE: &str = r#"{
    "page": 1,
    "results": [
        {
            "id": 157336,
            "title": "Interstellar",
            "release_date": "2014-11-05",
            "overview": "Space epic",
            "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
            "backdrop_path": "/xJHokMbljvjADYdit5fK5VQsXEG.jpg",
            "vote_average": 8.4,
            "genre_ids": [12, 18, 878],
            "popularity": 140.2
        },
        {
            "id": 27205,
            "title": "Inception",
            "release_date": "",
            "overview": null,
            "poster_path": null,
            "vote_average": 8.4
        }
    ],
    "total_pages": 1,
    "total_results": 2
}"#;

fn api_key() -> Matcher {
    Matcher::UrlEncoded("api_key".into(), "test_key".into())
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_popular_parses_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/movie/popular")
        .match_query(api_key())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PAGE)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.get_popular().await.expect("page");

    mock.assert_async().await;

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].id, 157336);
    assert_eq!(page.results[0].title, "Interstellar");
    assert_eq!(page.results[0].year_label(), "2014");

    // Missing fields stay absent rather than failing the parse
    assert_eq!(page.results[1].poster_path, None);
    assert_eq!(page.results[1].overview, None);
    assert_eq!(page.results[1].year_label(), "N/A");
}

#[tokio::test]
async fn test_trending_and_top_rated_paths() {
    let mut server = Server::new_async().await;
    let trending = server
        .mock("GET", "/trending/movie/day")
        .match_query(api_key())
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;
    let top = server
        .mock("GET", "/movie/top_rated")
        .match_query(api_key())
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.get_trending().await.is_some());
    assert!(client.get_top_rated().await.is_some());

    trending.assert_async().await;
    top.assert_async().await;
}

#[tokio::test]
async fn test_empty_results_are_not_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(api_key())
        .with_status(200)
        .with_body(r#"{"page": 1, "results": [], "total_pages": 0, "total_results": 0}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.get_popular().await.expect("empty page is still a page");
    assert!(page.results.is_empty());
}

// =============================================================================
// Search & Discovery
// =============================================================================

#[tokio::test]
async fn test_search_encodes_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("query".into(), "blade runner & co".into()),
        ]))
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.search_by_title("  blade runner & co ").await.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_blank_search_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.search_by_title("   ").await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_discover_by_genre_params() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::AllOf(vec![
            api_key(),
            Matcher::UrlEncoded("with_genres".into(), "28".into()),
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
        ]))
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.discover_by_genre(28).await.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_genre_list() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/genre/movie/list")
        .match_query(api_key())
        .with_status(200)
        .with_body(r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 35, "name": "Comedy"}]}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let genres = client.get_genres().await.expect("genres");
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].id, 35);
    assert_eq!(genres[1].name, "Comedy");
}

// =============================================================================
// Single Movie
// =============================================================================

#[tokio::test]
async fn test_details_parses_genres_and_runtime() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/157336")
        .match_query(api_key())
        .with_status(200)
        .with_body(
            r#"{
                "id": 157336,
                "title": "Interstellar",
                "release_date": "2014-11-05",
                "overview": "Space epic",
                "poster_path": "/p.jpg",
                "vote_average": 8.4,
                "runtime": 169,
                "genres": [{"id": 12, "name": "Adventure"}, {"id": 18, "name": "Drama"}],
                "tagline": "Mankind was born on Earth."
            }"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.get_details(157336).await.expect("detail");
    assert_eq!(detail.id(), 157336);
    assert_eq!(detail.runtime_label(), "2h 49m");
    assert_eq!(detail.meta_line(), "2014 • Adventure, Drama • 2h 49m");
}

#[tokio::test]
async fn test_similar_and_recommendations_paths() {
    let mut server = Server::new_async().await;
    let similar = server
        .mock("GET", "/movie/42/similar")
        .match_query(api_key())
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;
    let recs = server
        .mock("GET", "/movie/42/recommendations")
        .match_query(api_key())
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.get_similar(42).await.is_some());
    assert!(client.get_recommendations(42).await.is_some());
    similar.assert_async().await;
    recs.assert_async().await;
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_server_error_is_absent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.get_popular().await.is_none());
}

#[tokio::test]
async fn test_malformed_json_is_absent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.get_popular().await.is_none());
}

#[tokio::test]
async fn test_missing_results_field_is_absent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/movie/popular")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status_message": "nope"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(client.get_popular().await.is_none());
}

#[tokio::test]
async fn test_try_get_details_keeps_error_kind() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/movie/1")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _denied = server
        .mock("GET", "/movie/2")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    assert!(matches!(
        client.try_get_details(1).await,
        Err(TmdbError::NotFound)
    ));
    assert!(matches!(
        client.try_get_details(2).await,
        Err(TmdbError::Unauthorized(401))
    ));
    assert!(client.get_details(1).await.is_none());
}

#[tokio::test]
async fn test_unreachable_host_is_absent() {
    // Nothing listens on port 9 locally
    let client = TmdbClient::with_base_url("test_key", "http://127.0.0.1:9");
    assert!(client.get_trending().await.is_none());
}
