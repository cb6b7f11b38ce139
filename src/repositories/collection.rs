use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::KeyValueStorage;
use crate::models::RepositoryResult;

/// A JSON array persisted under a single storage key.
///
/// Reads never fail: a missing, unreadable or malformed entry loads as an
/// empty collection. Writes and clears never fail either; errors are logged
/// and the change is dropped, leaving the previous stored value untouched.
pub struct JsonCollection<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the collection, degrading to empty on any failure
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "Failed to load collection, using empty");
                Vec::new()
            }
        }
    }

    /// Persist the collection, dropping the write on any failure
    #[instrument(skip(self, items), fields(key = %self.key, count = items.len()))]
    pub fn save(&self, items: &[T]) {
        match self.try_save(items) {
            Ok(()) => debug!("Collection saved"),
            Err(e) => warn!(error = %e, "Failed to save collection, write dropped"),
        }
    }

    /// Drop the stored entry so the collection reads as empty again
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn clear(&self) {
        match self.storage.remove_item(&self.key) {
            Ok(()) => debug!("Collection cleared"),
            Err(e) => warn!(error = %e, "Failed to clear collection, entry kept"),
        }
    }

    /// Load the collection, surfacing storage and parse errors
    pub fn try_load(&self) -> RepositoryResult<Vec<T>> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the collection, surfacing storage and serialization errors
    pub fn try_save(&self, items: &[T]) -> RepositoryResult<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(&self.key, &raw)
    }
}

impl<T> fmt::Debug for JsonCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCollection")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
