//! The favorites manager.
//!
//! [`FavoritesManager`] owns an in-memory copy of the favorites collection
//! and keeps it consistent with a [`DurableRecord`]. Reads are served from
//! the cache without touching storage. Every mutation writes the durable
//! record first and only then updates the cache, so a reader never sees a
//! favorite whose write has not committed.
//!
//! Loads and mutations run one at a time per manager. A mutation computes its
//! new collection only once it holds the writer lock, so two quick toggles
//! issued from different threads cannot overwrite each other's result.

use crate::model::{FavoriteRecipe, FavoritesCollection, ModelError};
use crate::store::{DurableRecord, KeyValueStore, StoreError};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, error};

mod model;

pub use model::{CacheState, LoadOutcome, Toggled};

/// Errors returned by favorites mutations.
///
/// A failed mutation leaves both the cache and the durable record exactly as
/// they were before the call.
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Favorites have not been loaded")]
    NotReady,

    #[error("Recipe is already a favorite: {0}")]
    AlreadyFavorited(String),

    #[error("Failed to persist favorites: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to encode favorites: {0}")]
    Model(#[from] ModelError),
}

/// Keeps the favorites cache and its durable record in step.
///
/// # Examples
///
/// ```
/// use recipe_favorites::favorites::{FavoritesManager, Toggled};
/// use recipe_favorites::store::{DurableRecord, MemoryStore};
/// use recipe_favorites::{FavoriteRecipe, RecipeSource};
///
/// let manager = FavoritesManager::new(DurableRecord::favorites(MemoryStore::new()));
/// manager.load();
///
/// let recipe = FavoriteRecipe::new("recipe-1", RecipeSource::default());
/// assert_eq!(manager.toggle(recipe.clone())?, Toggled::Added);
/// assert!(manager.is_favorite("recipe-1"));
///
/// assert_eq!(manager.toggle(recipe)?, Toggled::Removed);
/// assert!(!manager.is_favorite("recipe-1"));
/// # Ok::<(), recipe_favorites::favorites::FavoritesError>(())
/// ```
#[derive(Debug)]
pub struct FavoritesManager<S> {
    record: DurableRecord<S>,
    cache: RwLock<CacheState>,
    writer: Mutex<()>,
}

impl<S: KeyValueStore> FavoritesManager<S> {
    /// Creates a manager over `record`. Nothing is read until [`load`](Self::load).
    pub fn new(record: DurableRecord<S>) -> Self {
        FavoritesManager {
            record,
            cache: RwLock::new(CacheState::Uninitialized),
            writer: Mutex::new(()),
        }
    }

    pub fn record(&self) -> &DurableRecord<S> {
        &self.record
    }

    /// Replaces the cache with a fresh snapshot of the durable record.
    ///
    /// Never fails: an unreadable or undecodable record is logged and the
    /// cache becomes an empty collection. An empty record counts as absent.
    pub fn load(&self) -> LoadOutcome {
        let _writer = self.lock_writer();
        self.set_state(CacheState::Loading);

        let (collection, outcome) = match self.record.get() {
            Ok(None) => (FavoritesCollection::new(), LoadOutcome::Empty),
            Ok(Some(bytes)) if bytes.is_empty() => (FavoritesCollection::new(), LoadOutcome::Empty),
            Ok(Some(bytes)) => match FavoritesCollection::from_bytes(&bytes) {
                Ok(collection) => {
                    let count = collection.len();
                    (collection, LoadOutcome::Restored { count })
                }
                Err(e) => {
                    error!(key = self.record.key(), error = %e, "error loading favorites");
                    (FavoritesCollection::new(), LoadOutcome::Reset)
                }
            },
            Err(e) => {
                error!(key = self.record.key(), error = %e, "error loading favorites");
                (FavoritesCollection::new(), LoadOutcome::Reset)
            }
        };

        debug!(count = collection.len(), ?outcome, "favorites loaded");
        self.set_state(CacheState::Ready(collection));
        outcome
    }

    /// Drops the cache and returns to the uninitialized state.
    pub fn dispose(&self) {
        let _writer = self.lock_writer();
        self.set_state(CacheState::Uninitialized);
    }

    /// Returns true if `id` is in the cache.
    ///
    /// Before the first load completes this is always false.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.read_state()
            .collection()
            .is_some_and(|collection| collection.contains(id))
    }

    /// Returns a snapshot of the cached favorites, empty until loaded.
    pub fn favorites(&self) -> FavoritesCollection {
        self.read_state().collection().cloned().unwrap_or_default()
    }

    pub fn state(&self) -> CacheState {
        self.read_state().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.read_state(), CacheState::Loading)
    }

    /// Appends `recipe` and persists the result.
    pub fn add(&self, recipe: FavoriteRecipe) -> Result<(), FavoritesError> {
        let _writer = self.lock_writer();
        self.add_locked(recipe)
    }

    /// Removes the favorite with `id` and persists the result.
    ///
    /// Removing an id that is not present still rewrites the record.
    pub fn remove(&self, id: &str) -> Result<(), FavoritesError> {
        let _writer = self.lock_writer();
        self.remove_locked(id)
    }

    /// Removes `recipe` if it is a favorite, adds it otherwise.
    ///
    /// The decision is taken against the latest committed state.
    pub fn toggle(&self, recipe: FavoriteRecipe) -> Result<Toggled, FavoritesError> {
        let _writer = self.lock_writer();
        if self.snapshot()?.contains(&recipe.id) {
            self.remove_locked(&recipe.id)?;
            Ok(Toggled::Removed)
        } else {
            self.add_locked(recipe)?;
            Ok(Toggled::Added)
        }
    }

    fn add_locked(&self, recipe: FavoriteRecipe) -> Result<(), FavoritesError> {
        let updated = match self.snapshot()?.with_added(recipe) {
            Ok(updated) => updated,
            Err(ModelError::DuplicateId(id)) => return Err(FavoritesError::AlreadyFavorited(id)),
            Err(e) => return Err(e.into()),
        };
        self.commit(updated)
    }

    fn remove_locked(&self, id: &str) -> Result<(), FavoritesError> {
        let updated = self.snapshot()?.without(id);
        self.commit(updated)
    }

    /// Writes `updated` durably, then reflects it in the cache.
    fn commit(&self, updated: FavoritesCollection) -> Result<(), FavoritesError> {
        let bytes = updated.to_bytes()?;
        if let Err(e) = self.record.set(&bytes) {
            error!(key = self.record.key(), error = %e, "error saving favorites");
            return Err(e.into());
        }
        self.set_state(CacheState::Ready(updated));
        Ok(())
    }

    fn snapshot(&self) -> Result<FavoritesCollection, FavoritesError> {
        self.read_state()
            .collection()
            .cloned()
            .ok_or(FavoritesError::NotReady)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, CacheState> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: CacheState) {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
