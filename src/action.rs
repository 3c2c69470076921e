//! User intents
//!
//! Every interactive node carries an [`Action`]; key and mouse handling
//! produce them too, so there is one dispatch path for both.

/// Where a wishlist toggle was triggered, so that control can be refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOrigin {
    Hero,
    Card,
    Modal,
}

/// Navigation bar targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// "Movies": popular list
    Movies,
    /// "Suggestions": top rated list
    Suggestions,
    Wishlist,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Initial load: hero, popular grid, genre list
    Start,
    Navigate(NavTarget),
    /// Resolve the current search text immediately
    SubmitSearch,
    /// Search text was emptied
    ClearSearch,
    /// Genre by table name (quick buttons)
    ShowGenre(String),
    /// Genre picked by id from the catalog list
    ShowGenreId { id: u32, name: String },
    ShowGenrePicker,
    OpenDetail(u64),
    CloseModal,
    Rate { movie_id: u64, value: u8 },
    ToggleWishlist { movie_id: u64, origin: ToggleOrigin },
    RemoveFromWishlist(u64),
    FindSimilar(u64),
    Quit,
}
