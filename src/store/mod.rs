//! Durable key-value storage for the favorites record.
//!
//! The favorites collection is always persisted as a single blob under a
//! single key. [`KeyValueStore`] is the seam hosts implement (or pick one of
//! the bundled [`FileStore`] / [`MemoryStore`]); [`DurableRecord`] binds one
//! key to a store and exposes the whole-record `get` / `set` pair the
//! favorites manager works against.

use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the favorites collection is persisted.
pub const FAVORITES_KEY: &str = "@recipes_favorites";

/// Errors that can occur while reading or writing the durable store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read key {key}: {message}")]
    ReadFailed { key: String, message: String },

    #[error("Failed to write key {key}: {message}")]
    WriteFailed { key: String, message: String },

    #[error("Invalid store location: {0}")]
    InvalidLocation(Utf8PathBuf),
}

/// A persistent key-value space holding whole values per key.
///
/// Implementations must treat a missing key as `Ok(None)`, and `set` must
/// either fully replace the value or leave the previous one in place.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// One named record inside a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct DurableRecord<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DurableRecord<S> {
    /// Binds `key` inside `store`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        DurableRecord {
            store,
            key: key.into(),
        }
    }

    /// Binds the default favorites key inside `store`.
    pub fn favorites(store: S) -> Self {
        Self::new(store, FAVORITES_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the stored payload, or `None` if the record was never written.
    pub fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.store.get(&self.key)
    }

    /// Replaces the stored payload.
    pub fn set(&self, value: &[u8]) -> Result<(), StoreError> {
        self.store.set(&self.key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_favorites_key() {
        let record = DurableRecord::favorites(MemoryStore::new());
        assert_eq!(record.key(), "@recipes_favorites");
        assert!(record.get().unwrap().is_none());

        record.set(b"[]").unwrap();
        assert_eq!(record.get().unwrap().as_deref(), Some(&b"[]"[..]));
        assert_eq!(
            record.store().get(FAVORITES_KEY).unwrap().as_deref(),
            Some(&b"[]"[..])
        );
    }

    #[test]
    fn test_records_with_different_keys_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let first = DurableRecord::new(Arc::clone(&store), "first");
        let second = DurableRecord::new(Arc::clone(&store), "second");

        first.set(b"one").unwrap();
        assert!(second.get().unwrap().is_none());

        second.set(b"two").unwrap();
        assert_eq!(first.get().unwrap().as_deref(), Some(&b"one"[..]));
        assert_eq!(second.get().unwrap().as_deref(), Some(&b"two"[..]));
    }

    #[test]
    fn test_boxed_store_forwards() {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        let record = DurableRecord::favorites(store);
        record.set(b"[1]").unwrap();
        assert_eq!(record.get().unwrap().as_deref(), Some(&b"[1]"[..]));
    }
}
