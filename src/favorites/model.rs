use crate::model::FavoritesCollection;

/// Observable state of the favorites cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Nothing has been loaded yet, or the manager was disposed
    #[default]
    Uninitialized,
    /// A load is reading the durable record
    Loading,
    /// The cache mirrors the durable record
    Ready(FavoritesCollection),
}

impl CacheState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CacheState::Ready(_))
    }

    /// Returns the cached collection once ready.
    pub fn collection(&self) -> Option<&FavoritesCollection> {
        match self {
            CacheState::Ready(collection) => Some(collection),
            _ => None,
        }
    }
}

/// What a load found in the durable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The record held `count` favorites
    Restored { count: usize },
    /// The record has never been written
    Empty,
    /// The record could not be read or decoded; the cache was reset to empty
    Reset,
}

/// The effect of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Added,
    Removed,
}
