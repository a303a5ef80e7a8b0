//! Persistent key/value string storage.
//!
//! The cart treats its backing store as an opaque `get`/`set` string map,
//! the same contract a browser's local storage offers. Two backends ship:
//!
//! - [`MemoryStore`] - process-local, used in tests and ephemeral runs
//! - [`FileStore`] - a single JSON object file on disk
//!
//! # File format
//!
//! ```json
//! { "products": "[{\"id\":\"p1\",\"quantity\":1}]" }
//! ```
//!
//! Values are stored as strings; what they contain is the caller's business.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Encoding the store contents failed.
    #[error("failed to encode storage contents: {0}")]
    Encode(#[source] serde_json::Error),
}

/// A string key/value store.
///
/// Reads take `&self`; writes take `&mut self` because the cart store owns
/// its backend exclusively.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Fetch the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Process-local store. Contents vanish with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.to_owned());
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// A store backed by one JSON object file.
///
/// The whole file is loaded on open and rewritten on every `set`. Writes go
/// to a sibling temporary file that is then renamed over the original, so a
/// reader never observes a half-written file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// and its parent directories are created on first write.
    ///
    /// A file that is not a JSON object of strings is moved aside to
    /// [`Self::corrupt_path`] and the store starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    Self::quarantine(&path, &e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Opened file store");
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable file at `path` is moved on open.
    #[must_use]
    pub fn corrupt_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    fn quarantine(path: &Path, error: &serde_json::Error) {
        let target = Self::corrupt_path(path);
        match std::fs::rename(path, &target) {
            Ok(()) => tracing::warn!(
                path = %path.display(),
                moved_to = %target.display(),
                error = %error,
                "Storage file is corrupt, starting empty"
            ),
            // The next write replaces the file anyway.
            Err(rename_err) => tracing::warn!(
                path = %path.display(),
                error = %error,
                rename_error = %rename_err,
                "Storage file is corrupt and could not be moved aside, starting empty"
            ),
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let encoded = serde_json::to_string_pretty(&self.entries).map_err(StorageError::Encode)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, encoded).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        if let Err(e) = self.persist() {
            // Keep memory consistent with disk.
            match previous {
                Some(old) => self.entries.insert(key.to_owned(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("products").unwrap(), None);

        store.set("products", "[]").unwrap();
        assert_eq!(store.get("products").unwrap().as_deref(), Some("[]"));

        store.set("products", "[1]").unwrap();
        assert_eq!(store.get("products").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_boxed_store_forwards() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::with_entry("k", "v"));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nope.json")).unwrap();
        assert_eq!(store.get("products").unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("products", r#"[{"id":"p1","quantity":2}]"#).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("products").unwrap().as_deref(),
            Some(r#"[{"id":"p1","quantity":2}]"#)
        );
    }

    #[test]
    fn test_file_store_empty_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "  \n").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("products").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_envelope_is_moved_aside() {
        for garbage in ["not json", r#"{"products":[1,2]}"#, r#"{"products":"#] {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cart.json");
            std::fs::write(&path, garbage).unwrap();

            let mut store = FileStore::open(&path).unwrap();
            assert_eq!(store.get("products").unwrap(), None, "{garbage:?}");
            assert!(!path.exists());
            assert_eq!(
                std::fs::read_to_string(FileStore::corrupt_path(&path)).unwrap(),
                garbage
            );

            store.set("products", "[]").unwrap();
            let reopened = FileStore::open(&path).unwrap();
            assert_eq!(reopened.get("products").unwrap().as_deref(), Some("[]"));
        }
    }

    #[test]
    fn test_corrupt_path_appends_suffix() {
        assert_eq!(
            FileStore::corrupt_path(Path::new("data/cart.json")),
            PathBuf::from("data/cart.json.corrupt")
        );
    }
}
