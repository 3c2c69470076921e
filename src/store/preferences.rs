//! Cine-Ratings and wishlist on top of a [`KeyValueStore`]
//!
//! Both values are JSON text under fixed keys:
//! - ratings: `{"<movie id>": <1-10>, ...}`
//! - wishlist: `[<movie id>, ...]`
//!
//! Reads never fail: a missing or corrupt blob is an empty value.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::kv::KeyValueStore;
use crate::models::Rating;

pub const RATINGS_KEY: &str = "cineRateUserRatings";
pub const WISHLIST_KEY: &str = "cineRateWishlist";

/// User preferences (ratings + wishlist)
pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("ratings", &self.ratings().len())
            .field("wishlist", &self.wishlist_count())
            .finish()
    }
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    // -------------------------------------------------------------------------
    // Ratings
    // -------------------------------------------------------------------------

    /// All valid ratings keyed by movie id
    pub fn ratings(&self) -> BTreeMap<u64, Rating> {
        let Some(text) = self.store.get(RATINGS_KEY) else {
            return BTreeMap::new();
        };
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text) else {
            tracing::warn!(key = RATINGS_KEY, "ignoring corrupt ratings blob");
            return BTreeMap::new();
        };

        map.into_iter()
            .filter_map(|(id, value)| {
                let id = id.parse::<u64>().ok()?;
                let value = u8::try_from(value.as_u64()?).ok()?;
                Some((id, Rating::new(value)?))
            })
            .collect()
    }

    pub fn get_rating(&self, id: u64) -> Option<Rating> {
        self.ratings().get(&id).copied()
    }

    /// Record a rating; the last write for a movie wins
    pub fn set_rating(&mut self, id: u64, rating: Rating) {
        let mut ratings = self.ratings();
        ratings.insert(id, rating);

        let blob: BTreeMap<String, u8> = ratings
            .into_iter()
            .map(|(id, r)| (id.to_string(), r.get()))
            .collect();
        self.write(RATINGS_KEY, &blob);
        tracing::info!(movie_id = id, rating = rating.get(), "rating saved");
    }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    /// Wishlisted ids in insertion order, without duplicates
    pub fn get_wishlist(&self) -> Vec<u64> {
        let Some(text) = self.store.get(WISHLIST_KEY) else {
            return Vec::new();
        };
        let Ok(ids) = serde_json::from_str::<Vec<u64>>(&text) else {
            tracing::warn!(key = WISHLIST_KEY, "ignoring corrupt wishlist blob");
            return Vec::new();
        };

        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        unique
    }

    pub fn wishlist_count(&self) -> usize {
        self.get_wishlist().len()
    }

    pub fn is_wishlisted(&self, id: u64) -> bool {
        self.get_wishlist().contains(&id)
    }

    /// Returns `false` (and changes nothing) if `id` is already present
    pub fn add_to_wishlist(&mut self, id: u64) -> bool {
        let mut wishlist = self.get_wishlist();
        if wishlist.contains(&id) {
            return false;
        }
        wishlist.push(id);
        self.write(WISHLIST_KEY, &wishlist);
        true
    }

    pub fn remove_from_wishlist(&mut self, id: u64) {
        let mut wishlist = self.get_wishlist();
        wishlist.retain(|&w| w != id);
        self.write(WISHLIST_KEY, &wishlist);
    }

    /// Flip membership, returning the new state
    pub fn toggle_wishlist(&mut self, id: u64) -> bool {
        if self.is_wishlisted(id) {
            self.remove_from_wishlist(id);
            false
        } else {
            self.add_to_wishlist(id)
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(Into::into)
            .and_then(|text| self.store.set(key, text));
        if let Err(e) = result {
            tracing::warn!(key, error = %e, "failed to persist preferences");
        }
    }
}
