//! View layer
//!
//! Renderers turn movies into [`Node`] trees; the [`Document`] holds what is
//! currently displayed. Painting to the terminal lives in `ui`.

pub mod document;
pub mod node;
pub mod render;

pub use document::{Card, CardKind, Document, Grid, Modal, Notification, Phase};
pub use node::{Node, Star, Tone};
pub use render::{
    render_card, render_detail_modal, render_genre_picker, render_hero, render_wishlist_card,
    Images,
};
