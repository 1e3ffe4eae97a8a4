use super::{KeyValueStore, StoreError};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use tracing::warn;

const VALUE_EXTENSION: &str = "json";

/// A [`KeyValueStore`] keeping one file per key under a root directory.
///
/// Writes go to a temporary sibling file which is synced and then renamed
/// over the target, so readers observe either the previous value or the new
/// one. The root directory is synced after the rename so the new entry
/// survives a power loss.
///
/// # Examples
///
/// ```no_run
/// use recipe_favorites::store::{DurableRecord, FileStore};
///
/// let store = FileStore::new("/data/app/favorites")?;
/// let record = DurableRecord::favorites(store);
/// record.set(b"[]")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct FileStore {
    root: Utf8PathBuf,
    temp_counter: AtomicU64,
}

impl FileStore {
    /// Creates a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write. Fails if `root`
    /// exists but is not a directory.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        if root.exists() && !root.is_dir() {
            return Err(StoreError::InvalidLocation(root));
        }
        Ok(FileStore {
            root,
            temp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the file that backs `key`.
    pub fn path_for(&self, key: &str) -> Utf8PathBuf {
        self.root
            .join(format!("{}.{VALUE_EXTENSION}", file_stem_for_key(key)))
    }

    fn temp_path_for(&self, key: &str) -> Utf8PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{n}.tmp",
            file_stem_for_key(key),
            std::process::id()
        ))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;

        let target = self.path_for(key);
        let temp = self.temp_path_for(key);

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(value)?;
            file.sync_all()?;
            fs::rename(&temp, &target)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        // The new value is already visible to readers at this point
        if let Err(e) = sync_dir(&self.root) {
            warn!(root = %self.root, error = %e, "failed to sync store directory");
        }
        Ok(())
    }
}

/// Flushes directory metadata such as a completed rename to disk.
#[cfg(unix)]
fn sync_dir(dir: &Utf8Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Utf8Path) -> std::io::Result<()> {
    Ok(())
}

/// Maps an arbitrary key onto a safe file stem.
fn file_stem_for_key(key: &str) -> String {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let re = UNSAFE_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

    let stem = re.replace_all(key, "_");
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        // Empty and dot-only stems would resolve to the root or its parent
        format!("_{stem}")
    } else {
        stem.into_owned()
    }
}
