use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use super::domain::{Listing, ListingId};
use crate::storage::{KeyValueStore, StoreError};

/// Prefix of the per-user saved listing records.
pub const SAVED_LISTINGS_KEY: &str = "saved_listings";

#[derive(Debug, thiserror::Error)]
pub enum SavedListingsError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode saved listings: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("saved listings lock poisoned")]
    Poisoned,
}

pub fn saved_listings_key(user_id: u64) -> String {
    format!("{SAVED_LISTINGS_KEY}_{user_id}")
}

/// Favorites kept as a JSON array of listings, one entry per user.
///
/// Every read-modify-write runs under one lock so concurrent toggles never
/// overwrite each other's arrays.
pub struct SavedListings<S> {
    store: Arc<S>,
    writes: Arc<Mutex<()>>,
}

impl<S> Clone for SavedListings<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            writes: Arc::clone(&self.writes),
        }
    }
}

impl<S: KeyValueStore> SavedListings<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Saved listings in the order they were saved. A corrupt entry reads as empty.
    pub fn all(&self, user_id: u64) -> Result<Vec<Listing>, SavedListingsError> {
        let _guard = self.lock()?;
        self.read(user_id)
    }

    pub fn is_saved(&self, user_id: u64, id: &ListingId) -> Result<bool, SavedListingsError> {
        Ok(self.all(user_id)?.iter().any(|listing| &listing.id == id))
    }

    pub fn save(&self, user_id: u64, listing: &Listing) -> Result<(), SavedListingsError> {
        let _guard = self.lock()?;
        let mut saved = self.read(user_id)?;
        if saved.iter().any(|existing| existing.id == listing.id) {
            return Ok(());
        }
        saved.push(listing.clone());
        self.persist(user_id, &saved)
    }

    pub fn remove(&self, user_id: u64, id: &ListingId) -> Result<(), SavedListingsError> {
        let _guard = self.lock()?;
        let mut saved = self.read(user_id)?;
        saved.retain(|listing| &listing.id != id);
        self.persist(user_id, &saved)
    }

    /// Flips membership and returns whether the listing is saved afterwards.
    pub fn toggle(&self, user_id: u64, listing: &Listing) -> Result<bool, SavedListingsError> {
        let _guard = self.lock()?;
        let mut saved = self.read(user_id)?;
        let before = saved.len();
        saved.retain(|existing| existing.id != listing.id);

        let now_saved = saved.len() == before;
        if now_saved {
            saved.push(listing.clone());
            debug!(user_id, id = %listing.id, "listing saved");
        } else {
            debug!(user_id, id = %listing.id, "listing unsaved");
        }

        self.persist(user_id, &saved)?;
        Ok(now_saved)
    }

    pub fn clear_all(&self, user_id: u64) -> Result<(), SavedListingsError> {
        let _guard = self.lock()?;
        self.store.remove(&saved_listings_key(user_id))?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, SavedListingsError> {
        self.writes.lock().map_err(|_| SavedListingsError::Poisoned)
    }

    fn read(&self, user_id: u64) -> Result<Vec<Listing>, SavedListingsError> {
        let Some(raw) = self.store.get(&saved_listings_key(user_id))? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(listings) => Ok(listings),
            Err(err) => {
                warn!(user_id, error = %err, "discarding unreadable saved listings entry");
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, user_id: u64, saved: &[Listing]) -> Result<(), SavedListingsError> {
        let encoded = serde_json::to_string(saved)?;
        self.store.set(&saved_listings_key(user_id), encoded)?;
        Ok(())
    }
}
