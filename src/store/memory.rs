use super::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// An in-process [`KeyValueStore`].
///
/// Nothing survives the process. Besides ephemeral sessions this is the store
/// used to exercise failure handling: reads and writes can be made to fail on
/// demand, and reads or writes can be slowed down to widen race windows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
    write_delay: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `value` already present under `key`.
    pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        store
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Sleeps for `delay` before each read returns.
    pub fn set_read_delay(&self, delay: Option<Duration>) {
        *self
            .read_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Sleeps for `delay` before each write commits.
    pub fn set_write_delay(&self, delay: Option<Duration>) {
        *self
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Number of writes that committed.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let delay = *self
            .read_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::ReadFailed {
                key: key.to_string(),
                message: "read failure injected".to_string(),
            });
        }
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let delay = *self
            .write_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed {
                key: key.to_string(),
                message: "write failure injected".to_string(),
            });
        }

        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_with_value() {
        let store = MemoryStore::with_value("k", "v");
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"v"[..]));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_old_value() {
        let store = MemoryStore::with_value("k", "old");
        store.fail_writes(true);
        assert!(matches!(
            store.set("k", b"new"),
            Err(StoreError::WriteFailed { .. })
        ));
        store.fail_writes(false);
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"old"[..]));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_read_delay() {
        let store = MemoryStore::with_value("k", "v");
        store.set_read_delay(Some(Duration::from_millis(20)));
        let started = std::time::Instant::now();
        assert!(store.get("k").unwrap().is_some());
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_injected_read_failure() {
        let store = MemoryStore::with_value("k", "v");
        store.fail_reads(true);
        assert!(matches!(store.get("k"), Err(StoreError::ReadFailed { .. })));
        store.fail_reads(false);
        assert!(store.get("k").unwrap().is_some());
    }
}
