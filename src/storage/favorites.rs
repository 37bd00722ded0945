//! Favorite animals, persisted as a JSON array of ids.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{KeyValueStore, lock};
use crate::catalog::normalize_id;

/// Storage key for the favorites list.
pub const FAVORITES_KEY: &str = "animal-sounds-favorites";

/// Ordered set of favorite animal ids.
///
/// Loaded once on construction; every change is written back immediately.
/// Storage failures are logged and otherwise ignored, so the in-memory set
/// stays usable.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    favorites: Mutex<Vec<String>>,
}

impl FavoritesStore {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let favorites = read_favorites(store.as_ref());
        Self {
            store,
            favorites: Mutex::new(favorites),
        }
    }

    /// Flip `animal_id`. Returns whether it is now a favorite.
    pub fn toggle(&self, animal_id: &str) -> bool {
        let id = normalize_id(animal_id);
        let mut favorites = lock(&self.favorites);
        let now_favorite = match favorites.iter().position(|f| *f == id) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(id);
                true
            }
        };
        self.persist(&favorites);
        now_favorite
    }

    /// Add `animal_id`. Returns `false` if it was already present.
    pub fn add(&self, animal_id: &str) -> bool {
        let id = normalize_id(animal_id);
        let mut favorites = lock(&self.favorites);
        if favorites.contains(&id) {
            return false;
        }
        favorites.push(id);
        self.persist(&favorites);
        true
    }

    /// Remove `animal_id`. Returns `false` if it was not present.
    pub fn remove(&self, animal_id: &str) -> bool {
        let id = normalize_id(animal_id);
        let mut favorites = lock(&self.favorites);
        let before = favorites.len();
        favorites.retain(|f| *f != id);
        if favorites.len() == before {
            return false;
        }
        self.persist(&favorites);
        true
    }

    pub fn contains(&self, animal_id: &str) -> bool {
        lock(&self.favorites).contains(&normalize_id(animal_id))
    }

    /// Favorites in the order they were added.
    pub fn list(&self) -> Vec<String> {
        lock(&self.favorites).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.favorites).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut favorites = lock(&self.favorites);
        favorites.clear();
        self.persist(&favorites);
    }

    fn persist(&self, favorites: &[String]) {
        let result = serde_json::to_string(favorites)
            .map_err(crate::SoundboardError::from)
            .and_then(|json| self.store.set(FAVORITES_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to save favorites");
        }
    }
}

fn read_favorites(store: &dyn KeyValueStore) -> Vec<String> {
    let raw = match store.get(FAVORITES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "failed to load favorites");
            return Vec::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(ids) => {
            let mut out: Vec<String> = Vec::with_capacity(ids.len());
            for id in ids {
                if !out.contains(&id) {
                    out.push(id);
                }
            }
            out
        }
        Err(e) => {
            warn!(error = %e, "corrupt favorites data");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn toggle_adds_then_removes() {
        let favorites = FavoritesStore::load(store());
        assert!(favorites.toggle("Lion"));
        assert!(favorites.contains("lion"));
        assert!(!favorites.toggle("lion "));
        assert!(favorites.is_empty());
    }

    #[test]
    fn persists_to_store() {
        let backing = store();
        let favorites = FavoritesStore::load(backing.clone());
        favorites.add("cat");
        favorites.add("dog");
        assert!(!favorites.add("cat"));

        let reloaded = FavoritesStore::load(backing.clone());
        assert_eq!(reloaded.list(), vec!["cat", "dog"]);
        assert_eq!(
            backing.get(FAVORITES_KEY).unwrap().as_deref(),
            Some(r#"["cat","dog"]"#)
        );
    }

    #[test]
    fn corrupt_data_loads_empty() {
        let backing = store();
        backing.set(FAVORITES_KEY, "{not an array").unwrap();
        let favorites = FavoritesStore::load(backing);
        assert!(favorites.is_empty());
        assert!(favorites.add("frog"));
    }

    #[test]
    fn duplicates_in_storage_are_dropped() {
        let backing = store();
        backing.set(FAVORITES_KEY, r#"["lion","lion","cat"]"#).unwrap();
        assert_eq!(FavoritesStore::load(backing).list(), vec!["lion", "cat"]);
    }

    #[test]
    fn remove_and_clear() {
        let favorites = FavoritesStore::load(store());
        favorites.add("bird");
        favorites.add("frog");
        assert!(favorites.remove("bird"));
        assert!(!favorites.remove("bird"));
        favorites.clear();
        assert_eq!(favorites.len(), 0);
    }
}
