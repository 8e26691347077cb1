//! The user's saved artworks, persisted as one JSON array under a single key.

use chrono::Utc;

use crate::error::AppError;
use crate::models::{CollectionEntry, CollectionOutcome, NormalizedArtwork};
use crate::traits::KeyValueStore;

/// Storage key holding the serialized collection.
pub const COLLECTION_KEY: &str = "museum_collection";

/// Collection operations over any [`KeyValueStore`].
///
/// Never fails outward: malformed data is treated as an empty collection,
/// and store failures come back as unsuccessful [`CollectionOutcome`]s.
/// A failed read never leads to a write.
pub struct CollectionStore<S> {
    store: S,
}

impl<S: KeyValueStore> CollectionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All saved entries in insertion order.
    pub fn get(&self) -> Vec<CollectionEntry> {
        self.load().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to read collection");
            Vec::new()
        })
    }

    /// Stored entries. A missing key or malformed data reads as empty; only
    /// a failed store read is an error, so callers never write over data
    /// they could not see.
    fn load(&self) -> Result<Vec<CollectionEntry>, AppError> {
        let Some(raw) = self.store.get(COLLECTION_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(error = %e, "Stored collection is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn add(&self, artwork: NormalizedArtwork) -> CollectionOutcome {
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(id = %artwork.id, error = %e, "Error reading collection before add");
                return CollectionOutcome::failed("Failed to add to collection");
            }
        };
        if entries.iter().any(|entry| entry.artwork.id == artwork.id) {
            return CollectionOutcome::failed("Artwork already in collection");
        }

        let id = artwork.id.clone();
        entries.push(CollectionEntry {
            artwork,
            added_at: Utc::now(),
        });

        match self.write(&entries) {
            Ok(()) => {
                tracing::info!(%id, total = entries.len(), "Added to collection");
                CollectionOutcome::ok("Added to collection")
            }
            Err(e) => {
                tracing::error!(%id, error = %e, "Error adding to collection");
                CollectionOutcome::failed("Failed to add to collection")
            }
        }
    }

    /// Idempotent: removing an absent id still succeeds.
    pub fn remove(&self, id: &str) -> CollectionOutcome {
        let entries: Vec<_> = match self.load() {
            Ok(entries) => entries
                .into_iter()
                .filter(|entry| entry.artwork.id != id)
                .collect(),
            Err(e) => {
                tracing::error!(%id, error = %e, "Error reading collection before remove");
                return CollectionOutcome::failed("Failed to remove from collection");
            }
        };

        match self.write(&entries) {
            Ok(()) => CollectionOutcome::ok("Removed from collection"),
            Err(e) => {
                tracing::error!(%id, error = %e, "Error removing from collection");
                CollectionOutcome::failed("Failed to remove from collection")
            }
        }
    }

    pub fn clear(&self) -> CollectionOutcome {
        match self.store.remove(COLLECTION_KEY) {
            Ok(()) => CollectionOutcome::ok("Collection cleared"),
            Err(e) => {
                tracing::error!(error = %e, "Error clearing collection");
                CollectionOutcome::failed("Failed to clear collection")
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get().iter().any(|entry| entry.artwork.id == id)
    }

    fn write(&self, entries: &[CollectionEntry]) -> Result<(), AppError> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(COLLECTION_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MemoryStore, make_test_artwork};

    #[test]
    fn add_then_duplicate_is_rejected() {
        let collection = CollectionStore::new(MemoryStore::new());

        let outcome = collection.add(make_test_artwork("met-1"));
        assert!(outcome.success);
        assert!(collection.contains("met-1"));

        let outcome = collection.add(make_test_artwork("met-1"));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Artwork already in collection");
        assert_eq!(collection.get().len(), 1);
    }

    #[test]
    fn entries_keep_insertion_order_and_timestamp() {
        let collection = CollectionStore::new(MemoryStore::new());
        let before = Utc::now();
        collection.add(make_test_artwork("aic-2"));
        collection.add(make_test_artwork("rijks-SK-A-1935"));

        let entries = collection.get();
        assert_eq!(entries[0].artwork.id, "aic-2");
        assert_eq!(entries[1].artwork.id, "rijks-SK-A-1935");
        assert!(entries[0].added_at >= before);
    }

    #[test]
    fn remove_is_idempotent() {
        let collection = CollectionStore::new(MemoryStore::new());
        collection.add(make_test_artwork("met-1"));

        let outcome = collection.remove("met-404");
        assert!(outcome.success);
        assert_eq!(collection.get().len(), 1);

        let outcome = collection.remove("met-1");
        assert!(outcome.success);
        assert_eq!(outcome.message, "Removed from collection");
        assert!(!collection.contains("met-1"));
    }

    #[test]
    fn clear_empties_store() {
        let store = MemoryStore::new();
        let collection = CollectionStore::new(store.clone());
        collection.add(make_test_artwork("met-1"));

        let outcome = collection.clear();
        assert!(outcome.success);
        assert!(collection.get().is_empty());
        assert!(store.raw(COLLECTION_KEY).is_none());
    }

    #[test]
    fn malformed_data_reads_as_empty() {
        let collection =
            CollectionStore::new(MemoryStore::with_value(COLLECTION_KEY, "{not json"));
        assert!(collection.get().is_empty());
        assert!(!collection.contains("met-1"));

        // A subsequent add overwrites the corrupt value.
        assert!(collection.add(make_test_artwork("met-1")).success);
        assert_eq!(collection.get().len(), 1);
    }

    #[test]
    fn write_failures_are_reported_not_raised() {
        let collection = CollectionStore::new(MemoryStore::new().failing_writes());

        let outcome = collection.add(make_test_artwork("met-1"));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to add to collection");

        assert!(!collection.clear().success);
        assert!(!collection.remove("met-1").success);
    }

    #[test]
    fn read_failure_never_overwrites_saved_entries() {
        let store = MemoryStore::new();
        let collection = CollectionStore::new(store.clone());
        collection.add(make_test_artwork("met-1"));
        collection.add(make_test_artwork("met-2"));
        let saved = store.raw(COLLECTION_KEY);

        store.set_failing_reads(true);
        let outcome = collection.add(make_test_artwork("aic-9"));
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to add to collection");
        let outcome = collection.remove("met-1");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to remove from collection");
        assert!(collection.get().is_empty());
        assert_eq!(store.raw(COLLECTION_KEY), saved);

        store.set_failing_reads(false);
        let ids: Vec<_> = collection.get().into_iter().map(|e| e.artwork.id).collect();
        assert_eq!(ids, vec!["met-1", "met-2"]);
    }

    #[test]
    fn persisted_shape_is_flat_camel_case() {
        let store = MemoryStore::new();
        let collection = CollectionStore::new(store.clone());
        collection.add(make_test_artwork("aic-7"));

        let raw: serde_json::Value = serde_json::from_str(&store.raw(COLLECTION_KEY).unwrap()).unwrap();
        assert_eq!(raw[0]["id"], "aic-7");
        assert_eq!(raw[0]["museumCode"], "AIC");
        assert!(raw[0]["addedAt"].is_string());
    }
}
