//! UniFFI bindings for cross-platform support (iOS, Android).
//!
//! This module provides FFI-safe types and functions for use with UniFFI.
//! Recipe payloads cross the boundary as JSON strings.

use crate::favorites::{FavoritesError, FavoritesManager, LoadOutcome, Toggled};
use crate::model::{FavoriteRecipe, RecipeSource};
use crate::search::{Platform, SearchClient, SearchConfig, SearchError};
use crate::store::{DurableRecord, FileStore, StoreError};
use std::sync::Arc;

/// FFI-safe error type that wraps all possible errors.
#[derive(Debug, uniffi::Error, thiserror::Error)]
pub enum FavoritesFfiError {
    #[error("Favorites not loaded: {message}")]
    NotReady { message: String },

    #[error("Already a favorite: {message}")]
    AlreadyFavorited { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Invalid recipe: {message}")]
    InvalidRecipe { message: String },

    #[error("Search error: {message}")]
    SearchError { message: String },
}

impl From<FavoritesError> for FavoritesFfiError {
    fn from(e: FavoritesError) -> Self {
        match e {
            FavoritesError::NotReady => FavoritesFfiError::NotReady {
                message: FavoritesError::NotReady.to_string(),
            },
            FavoritesError::AlreadyFavorited(id) => {
                FavoritesFfiError::AlreadyFavorited { message: id }
            }
            FavoritesError::Store(e) => e.into(),
            FavoritesError::Model(e) => FavoritesFfiError::StorageError {
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for FavoritesFfiError {
    fn from(e: StoreError) -> Self {
        FavoritesFfiError::StorageError {
            message: e.to_string(),
        }
    }
}

impl From<SearchError> for FavoritesFfiError {
    fn from(e: SearchError) -> Self {
        FavoritesFfiError::SearchError {
            message: e.to_string(),
        }
    }
}

/// FFI-safe representation of a favorite recipe.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiFavoriteRecipe {
    /// Search backend document id
    pub id: String,
    /// Recipe title if present
    pub title: Option<String>,
    /// The full recipe payload as a JSON object string
    pub source_json: String,
}

impl From<&FavoriteRecipe> for FfiFavoriteRecipe {
    fn from(recipe: &FavoriteRecipe) -> Self {
        FfiFavoriteRecipe {
            id: recipe.id.clone(),
            title: recipe.title().map(|s| s.to_string()),
            source_json: serde_json::to_string(&recipe.source).unwrap_or_default(),
        }
    }
}

impl TryFrom<FfiFavoriteRecipe> for FavoriteRecipe {
    type Error = FavoritesFfiError;

    fn try_from(recipe: FfiFavoriteRecipe) -> Result<Self, Self::Error> {
        let source: RecipeSource = if recipe.source_json.trim().is_empty() {
            RecipeSource::default()
        } else {
            serde_json::from_str(&recipe.source_json).map_err(|e| {
                FavoritesFfiError::InvalidRecipe {
                    message: e.to_string(),
                }
            })?
        };
        Ok(FavoriteRecipe::new(recipe.id, source))
    }
}

/// Result of loading favorites from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiLoadOutcome {
    Restored { count: u32 },
    Empty,
    Reset,
}

impl From<LoadOutcome> for FfiLoadOutcome {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Restored { count } => FfiLoadOutcome::Restored {
                count: u32::try_from(count).unwrap_or(u32::MAX),
            },
            LoadOutcome::Empty => FfiLoadOutcome::Empty,
            LoadOutcome::Reset => FfiLoadOutcome::Reset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiToggled {
    Added,
    Removed,
}

impl From<Toggled> for FfiToggled {
    fn from(toggled: Toggled) -> Self {
        match toggled {
            Toggled::Added => FfiToggled::Added,
            Toggled::Removed => FfiToggled::Removed,
        }
    }
}

/// File-backed favorites, shared by every screen of the host app.
///
/// Methods block on disk I/O; call them off the UI thread.
#[derive(uniffi::Object)]
pub struct FfiFavorites {
    inner: FavoritesManager<FileStore>,
}

#[uniffi::export]
impl FfiFavorites {
    /// Opens favorites stored under `root_dir`. Nothing is read until `load`.
    #[uniffi::constructor]
    pub fn new(root_dir: String) -> Result<Arc<Self>, FavoritesFfiError> {
        let store = FileStore::new(root_dir)?;
        Ok(Arc::new(FfiFavorites {
            inner: FavoritesManager::new(DurableRecord::favorites(store)),
        }))
    }

    /// Reloads favorites from disk.
    pub fn load(&self) -> FfiLoadOutcome {
        self.inner.load().into()
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn is_favorite(&self, id: String) -> bool {
        self.inner.is_favorite(&id)
    }

    /// Returns all favorites in the order they were added.
    pub fn favorites(&self) -> Vec<FfiFavoriteRecipe> {
        self.inner
            .favorites()
            .iter()
            .map(FfiFavoriteRecipe::from)
            .collect()
    }

    pub fn add(&self, recipe: FfiFavoriteRecipe) -> Result<(), FavoritesFfiError> {
        self.inner.add(recipe.try_into()?)?;
        Ok(())
    }

    pub fn remove(&self, id: String) -> Result<(), FavoritesFfiError> {
        self.inner.remove(&id)?;
        Ok(())
    }

    pub fn toggle(&self, recipe: FfiFavoriteRecipe) -> Result<FfiToggled, FavoritesFfiError> {
        Ok(self.inner.toggle(recipe.try_into()?)?.into())
    }
}

// ============================================================================
// Exported FFI Functions
// ============================================================================

/// Returns the search host for this platform, honouring `RECIPES_SEARCH_HOST`.
#[uniffi::export]
pub fn default_search_host() -> String {
    SearchConfig::from_env(Platform::current()).host
}

/// Searches recipes by title on the backend at `host`.
///
/// # Arguments
/// * `host` - Base URL of the search backend, e.g. `http://localhost:9200`
/// * `text` - Title text to match
///
/// # Returns
/// Matching recipes, ready to be favorited.
#[uniffi::export]
pub fn search_recipes(
    host: String,
    text: String,
) -> Result<Vec<FfiFavoriteRecipe>, FavoritesFfiError> {
    let client = SearchClient::new(SearchConfig::new(host))?;
    let recipes = client.search(&text)?;
    Ok(recipes.iter().map(FfiFavoriteRecipe::from).collect())
}

/// Returns the library version.
#[uniffi::export]
pub fn library_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
