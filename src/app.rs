//! App state and core application logic
//!
//! Owns the grid state machine, the search box, the user's preferences and
//! the displayed [`Document`]. Input (keys, clicks, node actions) becomes an
//! [`Action`]; handling an action mutates the document and returns the
//! network [`Effect`]s still needed. Their [`Completion`]s come back through
//! [`App::apply`].

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::{Action, NavTarget, ToggleOrigin};
use crate::api::TmdbClient;
use crate::effects::{self, Completion, Effect, GridOutcome, GridRequest};
use crate::genre::{self, Resolution, QUICK_GENRES};
use crate::models::{Genre, MovieSummary, Rating, DEFAULT_IMAGE_BASE_URL};
use crate::store::Preferences;
use crate::view::{
    render_card, render_detail_modal, render_genre_picker, render_hero, render_wishlist_card,
    Card, CardKind, Document, Grid, Images, Modal,
};

/// Quiet period after the last keystroke before a search fires
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum trimmed length (exclusive) for debounced search
pub const MIN_SEARCH_LEN: usize = 2;

/// Similar-movie results shown
pub const SIMILAR_LIMIT: usize = 12;

// =============================================================================
// Grid State
// =============================================================================

/// What the grid is currently showing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GridView {
    /// Popular movies (default)
    #[default]
    Popular,
    /// Top rated ("Suggestions")
    TopRated,
    /// Discover by genre; `name` is lowercase
    Genre { id: u32, name: String },
    /// Title search
    Search(String),
    /// Movies similar to a movie id
    Similar(u64),
    Wishlist,
}

impl GridView {
    /// Section heading
    pub fn title(&self, wishlist_len: usize) -> String {
        match self {
            GridView::Popular => "Popular Movies".to_string(),
            GridView::TopRated => "Top Rated Suggestions".to_string(),
            GridView::Genre { name, .. } => format!("{} Movies", genre::display_name(name)),
            GridView::Search(query) => format!("Search Results for \"{}\"", query),
            GridView::Similar(_) => "Movies Similar to Your Selection".to_string(),
            GridView::Wishlist => format!("My Wishlist ({})", wishlist_len),
        }
    }

    fn loading_message(&self) -> &'static str {
        match self {
            GridView::Wishlist => "Loading your wishlist...",
            _ => "Loading movies...",
        }
    }

    fn failed_message(&self) -> &'static str {
        match self {
            GridView::Wishlist => "Failed to load wishlist movies.",
            _ => "Failed to load movies. Please try again later.",
        }
    }

    /// Placeholder for a successful, empty result
    fn empty(&self) -> Grid {
        let (title, hint) = match self {
            GridView::Genre { name, .. } => (format!("No {} movies found.", name), None),
            GridView::Search(_) => (
                "No movies found. Try a different search term.".to_string(),
                None,
            ),
            GridView::Similar(_) => ("No similar movies found.".to_string(), None),
            GridView::Wishlist => (
                "💔 Your wishlist is empty".to_string(),
                Some("Start adding movies you want to watch! Press m to browse.".to_string()),
            ),
            GridView::Popular | GridView::TopRated => ("No movies found.".to_string(), None),
        };
        Grid::Empty { title, hint }
    }

    fn card_kind(&self) -> CardKind {
        match self {
            GridView::Wishlist => CardKind::Wishlist,
            _ => CardKind::Standard,
        }
    }
}

// =============================================================================
// Input Mode
// =============================================================================

/// Where a left click landed, resolved against the painted layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// Inside the open modal
    Modal,
    /// On the grid card at this index
    Card(usize),
    Elsewhere,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Selection
// =============================================================================

/// Selected card in the grid, laid out row-major in `columns` columns
#[derive(Debug, Clone)]
pub struct Selection {
    pub selected: usize,
    pub len: usize,
    pub columns: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            selected: 0,
            len: 0,
            columns: 1,
        }
    }
}

impl Selection {
    pub fn left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(self.columns.max(1));
    }

    pub fn down(&mut self) {
        let next = self.selected + self.columns.max(1);
        if next < self.len {
            self.selected = next;
        } else if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn reset(&mut self, len: usize) {
        self.selected = 0;
        self.len = len;
    }
}

// =============================================================================
// Search Box
// =============================================================================

/// Search input; `cursor` counts characters, not bytes
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor: usize,
}

impl SearchState {
    fn byte_index(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let idx = self.byte_index(self.cursor);
        self.query.remove(idx);
        true
    }

    /// Delete character at cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let idx = self.byte_index(self.cursor);
        self.query.remove(idx);
        true
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Query text before and after the cursor
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.query.split_at(self.byte_index(self.cursor))
    }

    pub fn trimmed(&self) -> &str {
        self.query.trim()
    }
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    pub search: SearchState,
    /// Current grid state
    pub view: GridView,
    pub document: Document,
    pub selection: Selection,
    /// Highlighted entry in the genre picker
    pub picker_selection: usize,

    prefs: Preferences,
    image_base: String,
    /// Catalog genre list, empty until loaded
    genres: Vec<Genre>,
    hero_movie: Option<MovieSummary>,
    search_deadline: Option<Instant>,
    /// Latest issued grid request
    grid_seq: u64,
    /// Latest issued detail request
    detail_seq: u64,
}

impl App {
    pub fn new(prefs: Preferences) -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            search: SearchState::default(),
            view: GridView::Popular,
            document: Document::new(),
            selection: Selection::default(),
            picker_selection: 0,
            prefs,
            image_base: DEFAULT_IMAGE_BASE_URL.to_string(),
            genres: Vec::new(),
            hero_movie: None,
            search_deadline: None,
            grid_seq: 0,
            detail_seq: 0,
        }
    }

    /// Use a different image CDN for poster/backdrop URLs
    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn hero_movie(&self) -> Option<&MovieSummary> {
        self.hero_movie.as_ref()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Number of grid columns the painter is using
    pub fn set_grid_columns(&mut self, columns: usize) {
        self.selection.columns = columns.max(1);
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.document.grid.cards().get(self.selection.selected)
    }

    fn images(&self) -> Images<'_> {
        Images(&self.image_base)
    }

    fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.document.show_notification(message, now);
    }

    // -------------------------------------------------------------------------
    // Action Dispatch
    // -------------------------------------------------------------------------

    /// Apply an action to local state; returns the network work it needs
    pub fn handle_action(&mut self, action: Action, now: Instant) -> Vec<Effect> {
        tracing::debug!(?action, "action");
        match action {
            Action::Start => {
                self.document.wishlist_count = self.prefs.wishlist_count();
                let mut effects = vec![Effect::Hero];
                effects.extend(self.begin_grid(GridView::Popular));
                effects.push(Effect::Genres);
                effects
            }
            Action::Navigate(target) => {
                let view = match target {
                    NavTarget::Movies => GridView::Popular,
                    NavTarget::Suggestions => GridView::TopRated,
                    NavTarget::Wishlist => GridView::Wishlist,
                };
                self.begin_grid(view).into_iter().collect()
            }
            Action::SubmitSearch => {
                self.search_deadline = None;
                let query = self.search.trimmed().to_string();
                if query.is_empty() {
                    return Vec::new();
                }
                self.resolve_search(&query)
            }
            Action::ClearSearch => {
                self.search_deadline = None;
                self.begin_grid(GridView::Popular).into_iter().collect()
            }
            Action::ShowGenre(name) => {
                let Some(id) = genre::genre_id(&name) else {
                    tracing::warn!(genre = %name, "unknown genre");
                    return Vec::new();
                };
                self.close_genre_picker();
                self.begin_grid(GridView::Genre {
                    id,
                    name: name.trim().to_lowercase(),
                })
                .into_iter()
                .collect()
            }
            Action::ShowGenreId { id, name } => {
                self.close_genre_picker();
                self.begin_grid(GridView::Genre { id, name })
                    .into_iter()
                    .collect()
            }
            Action::ShowGenrePicker => {
                self.picker_selection = 0;
                let node = render_genre_picker(&self.genres);
                self.document.open_modal(Modal::GenrePicker { node });
                Vec::new()
            }
            Action::OpenDetail(movie_id) => {
                self.detail_seq += 1;
                vec![Effect::Detail {
                    seq: self.detail_seq,
                    movie_id,
                }]
            }
            Action::CloseModal => {
                self.document.close_modal();
                Vec::new()
            }
            Action::Rate { movie_id, value } => {
                let Some(rating) = Rating::new(value) else {
                    tracing::warn!(movie_id, value, "ignoring out-of-range rating");
                    return Vec::new();
                };
                self.prefs.set_rating(movie_id, rating);
                self.refresh_movie(movie_id);
                self.notify(format!("You rated this movie {}/10!", rating), now);
                Vec::new()
            }
            Action::ToggleWishlist { movie_id, origin } => {
                let added = self.prefs.toggle_wishlist(movie_id);
                tracing::info!(movie_id, added, ?origin, "wishlist toggled");
                self.after_wishlist_change(movie_id, added, now)
            }
            Action::RemoveFromWishlist(movie_id) => {
                self.prefs.remove_from_wishlist(movie_id);
                self.after_wishlist_change(movie_id, false, now)
            }
            Action::FindSimilar(movie_id) => {
                self.begin_grid(GridView::Similar(movie_id))
                    .into_iter()
                    .collect()
            }
            Action::Quit => {
                self.quit();
                Vec::new()
            }
        }
    }

    fn after_wishlist_change(&mut self, movie_id: u64, added: bool, now: Instant) -> Vec<Effect> {
        self.document.wishlist_count = self.prefs.wishlist_count();
        self.refresh_movie(movie_id);
        self.notify(
            if added {
                "Added to wishlist! ❤️"
            } else {
                "Removed from wishlist"
            },
            now,
        );

        if self.view == GridView::Wishlist {
            self.begin_grid(GridView::Wishlist).into_iter().collect()
        } else {
            Vec::new()
        }
    }

    fn close_genre_picker(&mut self) {
        if matches!(self.document.modal(), Some(Modal::GenrePicker { .. })) {
            self.document.close_modal();
        }
    }

    fn resolve_search(&mut self, query: &str) -> Vec<Effect> {
        let view = match genre::resolve(query) {
            Resolution::Genre { id, name } => GridView::Genre { id, name },
            Resolution::Title { text } => GridView::Search(text),
        };
        self.begin_grid(view).into_iter().collect()
    }

    /// Switch the grid to `view`: title, loading placeholder, new sequence
    /// number. Returns the request, or `None` when nothing needs fetching.
    fn begin_grid(&mut self, view: GridView) -> Option<Effect> {
        self.grid_seq += 1;

        // The current grid and modal stay up until similar results arrive
        if matches!(view, GridView::Similar(_)) {
            return Some(Effect::Grid(GridRequest {
                seq: self.grid_seq,
                view,
                wishlist: Vec::new(),
            }));
        }

        let wishlist = if view == GridView::Wishlist {
            self.prefs.get_wishlist()
        } else {
            Vec::new()
        };

        self.document.section_title = view.title(wishlist.len());
        self.selection.reset(0);
        self.view = view.clone();

        if view == GridView::Wishlist && wishlist.is_empty() {
            self.document.set_grid(view.empty());
            return None;
        }

        self.document
            .set_grid(Grid::Loading(view.loading_message().to_string()));
        Some(Effect::Grid(GridRequest {
            seq: self.grid_seq,
            view,
            wishlist,
        }))
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Fold a finished request into the document. Stale grid and detail
    /// responses (not the latest issued) are dropped.
    pub fn apply(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::Hero(page) => {
                let first = page.and_then(|p| p.results.into_iter().next());
                match first {
                    Some(movie) => {
                        self.hero_movie = Some(movie);
                        self.rerender_hero();
                    }
                    None => tracing::warn!("no trending movie for hero"),
                }
            }
            Completion::Genres(genres) => match genres {
                Some(genres) => {
                    tracing::debug!(count = genres.len(), "catalog genres loaded");
                    self.genres = genres;
                    if let Some(Modal::GenrePicker { node }) = self.document.modal_mut() {
                        *node = render_genre_picker(&self.genres);
                    }
                }
                None => tracing::warn!("genre list unavailable, using built-in table"),
            },
            Completion::Grid { seq, view, outcome } => {
                if seq != self.grid_seq {
                    tracing::debug!(seq, latest = self.grid_seq, ?view, "dropping stale grid response");
                    return;
                }
                self.finish_grid(view, outcome, now);
            }
            Completion::Detail {
                seq,
                movie_id,
                detail,
            } => {
                if seq != self.detail_seq {
                    tracing::debug!(seq, movie_id, "dropping stale detail response");
                    return;
                }
                match detail {
                    Some(detail) => {
                        let node = render_detail_modal(
                            self.images(),
                            &detail,
                            self.prefs.get_rating(movie_id),
                            self.prefs.is_wishlisted(movie_id),
                        );
                        self.document.open_modal(Modal::Detail { detail, node });
                    }
                    None => self.notify("Could not load movie details.", now),
                }
            }
        }
    }

    fn finish_grid(&mut self, view: GridView, outcome: GridOutcome, now: Instant) {
        let movies: Vec<MovieSummary> = match outcome {
            GridOutcome::Page(None) => {
                let failed = Grid::Failed(view.failed_message().to_string());
                if matches!(view, GridView::Similar(_)) {
                    self.similar_missed(view, failed, now);
                } else {
                    self.document.set_grid(failed);
                }
                return;
            }
            GridOutcome::Page(Some(page)) => page.results,
            GridOutcome::Wishlist { requested, movies } => {
                if movies.is_empty() && requested > 0 {
                    self.document
                        .set_grid(Grid::Failed(view.failed_message().to_string()));
                    return;
                }
                movies.into_iter().map(|d| d.summary).collect()
            }
        };

        let movies: Vec<MovieSummary> = match view {
            GridView::Similar(_) => movies.into_iter().take(SIMILAR_LIMIT).collect(),
            _ => movies,
        };

        if movies.is_empty() {
            let empty = view.empty();
            if matches!(view, GridView::Similar(_)) {
                self.similar_missed(view, empty, now);
            } else {
                self.document.set_grid(empty);
            }
            return;
        }

        if matches!(view, GridView::Similar(_)) {
            self.document.close_modal();
            self.document.section_title = view.title(0);
            self.view = view.clone();
        }

        match &view {
            GridView::Genre { name, .. } => {
                self.notify(format!("Found {} {} movies!", movies.len(), name), now)
            }
            GridView::Similar(_) => {
                self.notify("Here are some similar movies you might enjoy!", now)
            }
            _ => {}
        }

        let kind = view.card_kind();
        let cards: Vec<Card> = movies
            .into_iter()
            .map(|movie| self.render_grid_card(movie, kind))
            .collect();
        self.selection.reset(cards.len());
        self.document.set_grid(Grid::Cards(cards));
    }

    /// Nothing similar came back. Whatever the user was looking at stays,
    /// unless the grid never finished loading.
    fn similar_missed(&mut self, view: GridView, grid: Grid, now: Instant) {
        self.notify("No similar movies found.", now);
        if self.document.grid.is_loading() {
            self.document.section_title = view.title(0);
            self.view = view;
            self.selection.reset(0);
            self.document.set_grid(grid);
        }
    }

    // -------------------------------------------------------------------------
    // Rendering helpers
    // -------------------------------------------------------------------------

    fn render_grid_card(&self, movie: MovieSummary, kind: CardKind) -> Card {
        let rating = self.prefs.get_rating(movie.id);
        let node = match kind {
            CardKind::Standard => render_card(
                self.images(),
                &movie,
                rating,
                self.prefs.is_wishlisted(movie.id),
            ),
            CardKind::Wishlist => render_wishlist_card(self.images(), &movie, rating),
        };
        Card { movie, kind, node }
    }

    fn rerender_hero(&mut self) {
        self.document.hero = self.hero_movie.as_ref().map(|movie| {
            render_hero(
                Images(&self.image_base),
                movie,
                self.prefs.get_rating(movie.id),
                self.prefs.is_wishlisted(movie.id),
            )
        });
    }

    /// Re-render every control showing `movie_id` after a preference change
    fn refresh_movie(&mut self, movie_id: u64) {
        if self.hero_movie.as_ref().is_some_and(|m| m.id == movie_id) {
            self.rerender_hero();
        }

        let rating = self.prefs.get_rating(movie_id);
        let wishlisted = self.prefs.is_wishlisted(movie_id);
        let images = Images(&self.image_base);

        for card in self.document.grid.cards_mut() {
            if card.movie.id != movie_id {
                continue;
            }
            card.node = match card.kind {
                CardKind::Standard => render_card(images, &card.movie, rating, wishlisted),
                CardKind::Wishlist => render_wishlist_card(images, &card.movie, rating),
            };
        }

        if let Some(Modal::Detail { detail, node }) = self.document.modal_mut() {
            if detail.id() == movie_id {
                *node = render_detail_modal(images, detail, rating, wishlisted);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Search debounce
    // -------------------------------------------------------------------------

    /// React to an edit of the search text
    fn on_search_changed(&mut self, now: Instant) -> Vec<Effect> {
        let len = self.search.trimmed().chars().count();
        if len > MIN_SEARCH_LEN {
            self.search_deadline = Some(now + SEARCH_DEBOUNCE);
            Vec::new()
        } else if len == 0 {
            self.handle_action(Action::ClearSearch, now)
        } else {
            self.search_deadline = None;
            Vec::new()
        }
    }

    pub fn search_pending(&self) -> bool {
        self.search_deadline.is_some()
    }

    /// Fire the debounced search once its deadline has passed
    pub fn poll_debounce(&mut self, now: Instant) -> Vec<Effect> {
        match self.search_deadline {
            Some(deadline) if now >= deadline => {
                self.search_deadline = None;
                let query = self.search.trimmed().to_string();
                self.resolve_search(&query)
            }
            _ => Vec::new(),
        }
    }

    /// Expire the notification, fire a due search
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        self.document.tick(now);
        self.poll_debounce(now)
    }

    // -------------------------------------------------------------------------
    // Keyboard / Mouse
    // -------------------------------------------------------------------------

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.handle_action(Action::Quit, now);
        }

        if self.input_mode == InputMode::Editing {
            return self.handle_editing_key(key, now);
        }

        // Some(None) is the genre picker
        let action = match self.document.modal().map(Modal::movie_id) {
            Some(Some(movie_id)) => self.detail_key_action(key, movie_id),
            Some(None) => self.picker_key_action(key),
            None => self.normal_key_action(key),
        };

        match action {
            Some(action) => self.handle_action(action, now),
            None => Vec::new(),
        }
    }

    /// A left click. With a modal open only clicks outside it matter.
    pub fn handle_click(&mut self, click: Click, now: Instant) -> Vec<Effect> {
        if self.document.modal().is_some() {
            return match click {
                Click::Modal => Vec::new(),
                Click::Card(_) | Click::Elsewhere => self.handle_action(Action::CloseModal, now),
            };
        }

        let Click::Card(index) = click else {
            return Vec::new();
        };
        let Some(movie_id) = self.document.grid.cards().get(index).map(Card::movie_id) else {
            return Vec::new();
        };
        self.selection.selected = index;
        self.handle_action(Action::OpenDetail(movie_id), now)
    }

    fn handle_editing_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.handle_action(Action::SubmitSearch, now)
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                self.on_search_changed(now)
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.on_search_changed(now)
                } else {
                    Vec::new()
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.on_search_changed(now)
                } else {
                    Vec::new()
                }
            }
            KeyCode::Left => {
                self.search.cursor_left();
                Vec::new()
            }
            KeyCode::Right => {
                self.search.cursor_right();
                Vec::new()
            }
            KeyCode::Home => {
                self.search.cursor_home();
                Vec::new()
            }
            KeyCode::End => {
                self.search.cursor_end();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn detail_key_action(&self, key: KeyEvent, movie_id: u64) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char(c @ '1'..='9') => Some(Action::Rate {
                movie_id,
                value: c as u8 - b'0',
            }),
            KeyCode::Char('0') => Some(Action::Rate {
                movie_id,
                value: 10,
            }),
            KeyCode::Char('+') | KeyCode::Right => {
                let current = self.prefs.get_rating(movie_id).map(Rating::get).unwrap_or(0);
                Some(Action::Rate {
                    movie_id,
                    value: (current + 1).min(Rating::MAX),
                })
            }
            KeyCode::Char('-') | KeyCode::Left => {
                let current = self.prefs.get_rating(movie_id).map(Rating::get)?;
                Some(Action::Rate {
                    movie_id,
                    value: current.saturating_sub(1).max(Rating::MIN),
                })
            }
            KeyCode::Char('w') => Some(Action::ToggleWishlist {
                movie_id,
                origin: ToggleOrigin::Modal,
            }),
            KeyCode::Char('s') => Some(Action::FindSimilar(movie_id)),
            _ => None,
        }
    }

    /// Genre choices of the open picker, in display order
    pub fn picker_actions(&self) -> Vec<Action> {
        match self.document.modal() {
            Some(Modal::GenrePicker { node }) => node
                .buttons()
                .into_iter()
                .filter_map(|(_, action, _)| match action {
                    Action::ShowGenre(_) | Action::ShowGenreId { .. } => Some(action.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn picker_key_action(&mut self, key: KeyEvent) -> Option<Action> {
        let choices = self.picker_actions();
        match key.code {
            KeyCode::Esc => Some(Action::CloseModal),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => {
                self.picker_selection = self.picker_selection.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.picker_selection + 1 < choices.len() {
                    self.picker_selection += 1;
                }
                None
            }
            KeyCode::Enter => choices.get(self.picker_selection).cloned(),
            _ => None,
        }
    }

    fn normal_key_action(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Editing;
                self.search.cursor_end();
                None
            }
            KeyCode::Char('m') => Some(Action::Navigate(NavTarget::Movies)),
            KeyCode::Char('t') => Some(Action::Navigate(NavTarget::Suggestions)),
            KeyCode::Char('w') => Some(Action::Navigate(NavTarget::Wishlist)),
            KeyCode::Char('g') => Some(Action::ShowGenrePicker),
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as u8 - b'1') as usize;
                QUICK_GENRES
                    .get(idx)
                    .map(|name| Action::ShowGenre(name.to_string()))
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selection.left();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selection.right();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.down();
                None
            }
            KeyCode::Home => {
                self.selection.first();
                None
            }
            KeyCode::End => {
                self.selection.last();
                None
            }
            KeyCode::Enter => self.selected_card().map(|c| Action::OpenDetail(c.movie_id())),
            KeyCode::Char(' ') => self.selected_card().map(|c| Action::ToggleWishlist {
                movie_id: c.movie_id(),
                origin: ToggleOrigin::Card,
            }),
            KeyCode::Char('x') if self.view == GridView::Wishlist => self
                .selected_card()
                .map(|c| Action::RemoveFromWishlist(c.movie_id())),
            KeyCode::Char('v') => self.hero_movie.as_ref().map(|m| Action::OpenDetail(m.id)),
            KeyCode::Char('a') => self.hero_movie.as_ref().map(|m| Action::ToggleWishlist {
                movie_id: m.id,
                origin: ToggleOrigin::Hero,
            }),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Inline execution
    // -------------------------------------------------------------------------

    /// Run effects one after another against `client`, applying each result.
    ///
    /// Used by tests and the CLI; the TUI runs effects on background tasks.
    pub async fn run_effects(&mut self, client: &TmdbClient, effects: Vec<Effect>) {
        for effect in effects {
            let completion = effects::execute(client, effect).await;
            self.apply(completion, Instant::now());
        }
    }

    /// Handle `action` and run whatever it requests to completion
    pub async fn perform(&mut self, client: &TmdbClient, action: Action) {
        let effects = self.handle_action(action, Instant::now());
        self.run_effects(client, effects).await;
    }
}
