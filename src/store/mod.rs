//! Local preference storage
//!
//! Two layers:
//! - [`KeyValueStore`]: a small key → string blob store (file or memory)
//! - [`Preferences`]: Cine-Ratings and the wishlist, serialized as JSON
//!   under fixed keys

mod kv;
mod preferences;

pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use preferences::{Preferences, RATINGS_KEY, WISHLIST_KEY};
