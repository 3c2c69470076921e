//! The displayed page
//!
//! `Document` owns everything on screen: hero, section title, grid, the
//! modal slot and the notification slot. Both slots hold at most one
//! element; showing a new one drops the old one in the same call.

use std::time::{Duration, Instant};

use crate::models::{MovieDetail, MovieSummary};
use crate::view::node::Node;

/// Delay before a new notification becomes visible
pub const NOTIFICATION_ENTER: Duration = Duration::from_millis(100);
/// Time from insertion until the fade starts
pub const NOTIFICATION_HOLD: Duration = Duration::from_millis(3000);
/// Fade duration before removal
pub const NOTIFICATION_FADE: Duration = Duration::from_millis(300);

/// Which card template a grid uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Standard,
    /// Carries a remove control
    Wishlist,
}

/// A rendered grid card, kept with its movie so it can be re-rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub movie: MovieSummary,
    pub kind: CardKind,
    pub node: Node,
}

impl Card {
    pub fn movie_id(&self) -> u64 {
        self.movie.id
    }
}

/// Grid contents. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    Loading(String),
    Cards(Vec<Card>),
    /// Successful request with nothing to show
    Empty { title: String, hint: Option<String> },
    /// Request failed
    Failed(String),
}

impl Default for Grid {
    fn default() -> Self {
        Grid::Loading("Loading movies...".to_string())
    }
}

impl Grid {
    pub fn cards(&self) -> &[Card] {
        match self {
            Grid::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        match self {
            Grid::Cards(cards) => cards,
            _ => &mut [],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Grid::Loading(_))
    }

    /// Placeholder text for non-card states
    pub fn message(&self) -> Option<&str> {
        match self {
            Grid::Loading(msg) | Grid::Failed(msg) => Some(msg),
            Grid::Empty { title, .. } => Some(title),
            Grid::Cards(_) => None,
        }
    }
}

/// Contents of the modal slot
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Detail { detail: MovieDetail, node: Node },
    GenrePicker { node: Node },
}

impl Modal {
    pub fn node(&self) -> &Node {
        match self {
            Modal::Detail { node, .. } | Modal::GenrePicker { node } => node,
        }
    }

    pub fn movie_id(&self) -> Option<u64> {
        match self {
            Modal::Detail { detail, .. } => Some(detail.id()),
            Modal::GenrePicker { .. } => None,
        }
    }
}

/// Notification lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Leaving,
    Expired,
}

/// Transient banner
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at: now,
        }
    }

    pub fn phase(&self, now: Instant) -> Phase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < NOTIFICATION_ENTER {
            Phase::Entering
        } else if age < NOTIFICATION_HOLD {
            Phase::Visible
        } else if age < NOTIFICATION_HOLD + NOTIFICATION_FADE {
            Phase::Leaving
        } else {
            Phase::Expired
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub section_title: String,
    pub hero: Option<Node>,
    pub grid: Grid,
    pub wishlist_count: usize,
    modal: Option<Modal>,
    notification: Option<Notification>,
    scroll_locked: bool,
}

impl Document {
    pub fn new() -> Self {
        Self {
            section_title: "Popular Movies".to_string(),
            ..Self::default()
        }
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    // -------------------------------------------------------------------------
    // Modal slot
    // -------------------------------------------------------------------------

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// In-place updates (star display, wishlist button) of the open modal
    pub fn modal_mut(&mut self) -> Option<&mut Modal> {
        self.modal.as_mut()
    }

    /// Show `modal`, replacing whatever was open
    pub fn open_modal(&mut self, modal: Modal) {
        if let Some(old) = self.modal.replace(modal) {
            tracing::debug!(previous = ?old.movie_id(), "replacing open modal");
        }
        self.scroll_locked = true;
    }

    /// Remove the modal and restore scrolling. No-op when none is open.
    pub fn close_modal(&mut self) -> Option<Modal> {
        let closed = self.modal.take();
        if closed.is_some() {
            self.scroll_locked = false;
        }
        closed
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    // -------------------------------------------------------------------------
    // Notification slot
    // -------------------------------------------------------------------------

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Replace any current banner immediately (no fade for the old one)
    pub fn show_notification(&mut self, message: impl Into<String>, now: Instant) {
        let notification = Notification::new(message, now);
        tracing::debug!(message = %notification.message, "notification");
        self.notification = Some(notification);
    }

    /// Drop the banner once its timeline has run out
    pub fn tick(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.phase(now) == Phase::Expired)
        {
            self.notification = None;
        }
    }
}
