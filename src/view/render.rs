//! Movie view-models to node trees
//!
//! Pure functions: same input, same tree. Anything that needs the user's
//! rating or wishlist membership takes it as an argument.

use crate::action::{Action, ToggleOrigin};
use crate::genre;
use crate::models::{Genre, MovieDetail, MovieSummary, Rating, NOT_AVAILABLE};
use crate::view::node::{Node, Tone};

/// Image CDN base used for poster/backdrop URLs
#[derive(Debug, Clone, Copy)]
pub struct Images<'a>(pub &'a str);

/// Featured movie at the top of the page
pub fn render_hero(
    images: Images<'_>,
    movie: &MovieSummary,
    user_rating: Option<Rating>,
    is_wishlisted: bool,
) -> Node {
    let cine_rating = user_rating
        .map(|r| format!("{:.1}", f32::from(r.get())))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let wishlist_label = if is_wishlisted {
        "❤️ In Wishlist"
    } else {
        "+ Wishlist"
    };

    let mut children = Vec::new();
    if let Some(backdrop) = movie.backdrop_url(images.0) {
        children.push(Node::image(backdrop, movie.title.clone()));
    }
    children.extend([
        Node::styled("#1 Trending Today", Tone::Accent),
        Node::heading(1, movie.title.clone()),
        Node::styled(
            format!("{} • ★ {}", movie.year_label(), movie.vote_label()),
            Tone::Dim,
        ),
        Node::Row(vec![
            Node::badge(format!("TMDB: {}", movie.vote_label()), Tone::Normal),
            Node::badge(format!("Cine-Rate: {}", cine_rating), Tone::Gold),
        ]),
        Node::text(movie.overview_or_default()),
        Node::Row(vec![
            Node::button("View Details", Action::OpenDetail(movie.id)),
            Node::toggle(
                wishlist_label,
                Action::ToggleWishlist {
                    movie_id: movie.id,
                    origin: ToggleOrigin::Hero,
                },
                is_wishlisted,
            ),
        ]),
    ]);

    Node::Column(children)
}

/// Compact grid card
pub fn render_card(
    images: Images<'_>,
    movie: &MovieSummary,
    user_rating: Option<Rating>,
    is_wishlisted: bool,
) -> Node {
    let heart = if is_wishlisted { "❤️" } else { "🤍" };
    let overlay = Node::Row(vec![
        Node::styled(format!("★ {}", movie.vote_label()), Tone::Gold),
        Node::toggle(
            heart,
            Action::ToggleWishlist {
                movie_id: movie.id,
                origin: ToggleOrigin::Card,
            },
            is_wishlisted,
        ),
    ]);

    card(images, movie, user_rating, overlay)
}

/// Wishlist grid card, with a remove control on the poster
pub fn render_wishlist_card(
    images: Images<'_>,
    movie: &MovieSummary,
    user_rating: Option<Rating>,
) -> Node {
    let overlay = Node::Row(vec![
        Node::styled(format!("★ {}", movie.vote_label()), Tone::Gold),
        Node::button("✕", Action::RemoveFromWishlist(movie.id)),
    ]);

    card(images, movie, user_rating, overlay)
}

fn card(
    images: Images<'_>,
    movie: &MovieSummary,
    user_rating: Option<Rating>,
    overlay: Node,
) -> Node {
    let mut children = vec![
        Node::image(movie.poster_url(images.0), movie.title.clone()),
        overlay,
        Node::button(movie.title.clone(), Action::OpenDetail(movie.id)),
        Node::styled(movie.year_label(), Tone::Dim),
    ];
    if let Some(rating) = user_rating {
        children.push(Node::styled(
            format!("Your rating: {}/10", rating),
            Tone::Gold,
        ));
    }
    Node::Column(children)
}

/// "Your Rating: N/10" or "Your Rating: Not rated"
pub fn rating_label(user_rating: Option<Rating>) -> String {
    match user_rating {
        Some(r) => format!("Your Rating: {}/10", r),
        None => "Your Rating: Not rated".to_string(),
    }
}

/// Full detail overlay contents
pub fn render_detail_modal(
    images: Images<'_>,
    detail: &MovieDetail,
    user_rating: Option<Rating>,
    is_wishlisted: bool,
) -> Node {
    let movie = &detail.summary;
    let wishlist_label = if is_wishlisted {
        "❤️ In Wishlist"
    } else {
        "🤍 Add to Wishlist"
    };

    let mut media = vec![Node::image(movie.poster_url(images.0), movie.title.clone())];
    if let Some(backdrop) = movie.backdrop_url(images.0) {
        media.push(Node::image(backdrop, String::new()));
    }

    Node::Column(vec![
        Node::button("×", Action::CloseModal),
        Node::Row(media),
        Node::heading(2, movie.title.clone()),
        Node::styled(detail.meta_line(), Tone::Dim),
        Node::Row(vec![
            Node::badge(format!("TMDB: {}", movie.vote_label()), Tone::Normal),
            Node::badge(rating_label(user_rating), Tone::Gold),
        ]),
        Node::text(movie.overview_or_default()),
        Node::heading(3, "Rate this movie:"),
        Node::stars(movie.id, user_rating.map(Rating::get).unwrap_or(0)),
        Node::Row(vec![
            Node::toggle(
                wishlist_label,
                Action::ToggleWishlist {
                    movie_id: movie.id,
                    origin: ToggleOrigin::Modal,
                },
                is_wishlisted,
            ),
            Node::button("Get Similar Movies", Action::FindSimilar(movie.id)),
        ]),
    ])
}

/// "All genres" overlay. Uses the catalog's list when loaded, else the
/// built-in table.
pub fn render_genre_picker(catalog: &[Genre]) -> Node {
    let buttons: Vec<Node> = if catalog.is_empty() {
        genre::sorted_names()
            .into_iter()
            .map(|name| Node::button(genre::display_name(name), Action::ShowGenre(name.to_string())))
            .collect()
    } else {
        let mut sorted: Vec<&Genre> = catalog.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
            .into_iter()
            .map(|g| {
                Node::button(
                    g.name.clone(),
                    Action::ShowGenreId {
                        id: g.id,
                        name: g.name.to_lowercase(),
                    },
                )
            })
            .collect()
    };

    Node::Column(vec![
        Node::button("×", Action::CloseModal),
        Node::heading(2, "Browse by Genre"),
        Node::Column(buttons),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_IMAGE_BASE_URL, PLACEHOLDER_POSTER};

    const IMAGES: Images<'static> = Images(DEFAULT_IMAGE_BASE_URL);

    fn movie(release_date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id: 157336,
            title: "Interstellar".into(),
            poster_path: None,
            backdrop_path: Some("/backdrop.jpg".into()),
            release_date: release_date.map(String::from),
            vote_average: Some(8.4),
            overview: Some("Space epic".into()),
        }
    }

    fn images_of(node: &Node) -> Vec<&str> {
        node.walk()
            .into_iter()
            .filter_map(|n| match n {
                Node::Image { src, .. } => Some(src.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_card_year() {
        let card = render_card(IMAGES, &movie(Some("2014-11-07")), None, false);
        assert!(card.text_content().contains("2014"));
        assert!(!card.text_content().contains("2014-11"));

        let card = render_card(IMAGES, &movie(None), None, false);
        assert!(card.text_content().contains("N/A"));
    }

    #[test]
    fn test_card_placeholder_poster() {
        let card = render_card(IMAGES, &movie(None), None, false);
        assert_eq!(images_of(&card), vec![PLACEHOLDER_POSTER]);
    }

    #[test]
    fn test_card_user_rating_line() {
        let card = render_card(IMAGES, &movie(None), Rating::new(8), false);
        assert!(card.text_content().contains("Your rating: 8/10"));

        let card = render_card(IMAGES, &movie(None), None, false);
        assert!(!card.text_content().contains("Your rating"));
    }

    #[test]
    fn test_card_opens_detail_and_toggles() {
        let card = render_card(IMAGES, &movie(None), None, true);
        assert!(card.find_button(&Action::OpenDetail(157336)).is_some());
        let toggle = Action::ToggleWishlist {
            movie_id: 157336,
            origin: ToggleOrigin::Card,
        };
        assert_eq!(card.find_button(&toggle), Some(("❤️", true)));
    }

    #[test]
    fn test_wishlist_card_has_remove() {
        let card = render_wishlist_card(IMAGES, &movie(None), None);
        assert!(card.find_button(&Action::RemoveFromWishlist(157336)).is_some());
    }

    #[test]
    fn test_hero_missing_fields() {
        let bare = MovieSummary {
            id: 1,
            title: "Bare".into(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            vote_average: None,
            overview: None,
        };
        let hero = render_hero(IMAGES, &bare, None, false);
        let text = hero.text_content();
        assert!(text.contains("N/A • ★ N/A"));
        assert!(text.contains("TMDB: N/A"));
        assert!(text.contains("Cine-Rate: N/A"));
        assert!(text.contains("No description available."));
        assert!(!text.contains("undefined"));
    }

    #[test]
    fn test_hero_wishlist_state() {
        let hero = render_hero(IMAGES, &movie(Some("2014-11-07")), Rating::new(9), true);
        let text = hero.text_content();
        assert!(text.contains("Cine-Rate: 9.0"));
        assert!(text.contains("❤️ In Wishlist"));
    }

    #[test]
    fn test_detail_modal() {
        let detail = MovieDetail {
            summary: movie(Some("2014-11-07")),
            genres: vec![
                Genre { id: 12, name: "Adventure".into() },
                Genre { id: 18, name: "Drama".into() },
            ],
            runtime: Some(169),
        };

        let node = render_detail_modal(IMAGES, &detail, Rating::new(4), false);
        let text = node.text_content();
        assert!(text.contains("2014 • Adventure, Drama • 2h 49m"));
        assert!(text.contains("Your Rating: 4/10"));
        assert!(text.contains("🤍 Add to Wishlist"));
        assert!(node.find_button(&Action::FindSimilar(157336)).is_some());

        let filled = node.rating_stars().unwrap().iter().filter(|s| s.filled).count();
        assert_eq!(filled, 4);

        let unrated = render_detail_modal(IMAGES, &detail, None, true);
        assert!(unrated.text_content().contains("Your Rating: Not rated"));
        assert!(unrated.rating_stars().unwrap().iter().all(|s| !s.filled));
    }

    #[test]
    fn test_genre_picker_fallback_and_catalog() {
        let fallback = render_genre_picker(&[]);
        assert!(fallback
            .find_button(&Action::ShowGenre("western".into()))
            .is_some());

        let catalog = vec![
            Genre { id: 37, name: "Western".into() },
            Genre { id: 28, name: "Action".into() },
        ];
        let node = render_genre_picker(&catalog);
        let labels: Vec<&str> = node
            .buttons()
            .into_iter()
            .map(|(label, _, _)| label)
            .filter(|l| *l != "×")
            .collect();
        assert_eq!(labels, vec!["Action", "Western"]);
    }
}
