//! Key-value store implementations and the `LocalStorage` wrapper
//!
//! `LocalStorage` is a thin passthrough: values are serialized to JSON text
//! on the way in and parsed on the way out. When no backing store exists
//! every call is a no-op, matching browser storage in a non-browser host.

use crate::error::StoreError;
use crate::traits::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// File-backed store
///
/// All entries live in one JSON object file which is rewritten on every
/// mutation. The in-memory map only changes once the file write succeeds.
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`, starting empty if the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, "opened key-value store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;

        fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = lock(&self.entries);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Typed access to an optional key-value store
pub struct LocalStorage {
    store: Option<Box<dyn KeyValueStore>>,
}

impl LocalStorage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Some(Box::new(store)),
        }
    }

    /// Storage with no backing store; reads return defaults, writes are dropped
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Serializes `value` as JSON and stores it under `key`
    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let Some(store) = &self.store else {
            tracing::debug!(key, "storage unavailable, dropping write");
            return Ok(());
        };

        let text = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        store.set_raw(key, &text)
    }

    /// Reads and parses the value under `key`
    ///
    /// Returns `default` when storage is unavailable or the key is absent or
    /// empty. A stored JSON `null` reads as `None`.
    ///
    /// # Errors
    /// Returns `StoreError::Parse` when the stored text is not valid JSON for
    /// `T`; the caller decides how to recover.
    pub fn get_item<T: DeserializeOwned>(
        &self,
        key: &str,
        default: Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let Some(store) = &self.store else {
            return Ok(default);
        };

        match store.get_raw(key)? {
            Some(text) if !text.is_empty() => serde_json::from_str::<Option<T>>(&text)
                .map_err(|source| StoreError::Parse {
                    key: key.to_string(),
                    source,
                }),
            _ => Ok(default),
        }
    }

    /// Deletes the value under `key`
    pub fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match &self.store {
            Some(store) => store.remove(key),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set_raw("theme", "\"dark\"").unwrap();
        assert_eq!(store.get_raw("theme").unwrap().as_deref(), Some("\"dark\""));
        store.remove("theme").unwrap();
        assert_eq!(store.get_raw("theme").unwrap(), None);
    }

    #[test]
    fn test_get_item_falls_back_to_default() {
        let storage = LocalStorage::new(MemoryStore::new());
        let value: Option<u32> = storage.get_item("missing", Some(7)).unwrap();
        assert_eq!(value, Some(7));
        let value: Option<u32> = storage.get_item("missing", None).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_empty_text_reads_as_default() {
        let store = MemoryStore::new();
        store.set_raw("draft", "").unwrap();
        let storage = LocalStorage::new(store);
        let value: Option<String> = storage.get_item("draft", Some("none".to_string())).unwrap();
        assert_eq!(value.as_deref(), Some("none"));
    }

    #[test]
    fn test_malformed_text_surfaces_parse_error() {
        let store = MemoryStore::new();
        store.set_raw("recent", "{not json").unwrap();
        let storage = LocalStorage::new(store);
        let result: Result<Option<Vec<String>>, _> = storage.get_item("recent", None);
        assert!(matches!(result, Err(StoreError::Parse { ref key, .. }) if key == "recent"));
    }

    #[test]
    fn test_stored_null_reads_back_as_none() {
        let storage = LocalStorage::new(MemoryStore::new());
        storage.set_item("selected-platform", &None::<u32>).unwrap();
        let value: Option<u32> = storage.get_item("selected-platform", Some(7)).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_unavailable_storage_is_a_no_op() {
        let storage = LocalStorage::unavailable();
        assert!(!storage.is_available());
        storage.set_item("k", &1).unwrap();
        let value: Option<i32> = storage.get_item("k", None).unwrap();
        assert_eq!(value, None);
        storage.remove_item("k").unwrap();
    }

    #[test]
    fn test_file_store_persists_between_opens() {
        let path = std::env::temp_dir().join(format!(
            "ttingchu_store_test_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let store = FileKeyValueStore::open(&path).unwrap();
        store.set_raw("user", "{\"name\":\"a\"}").unwrap();
        drop(store);

        let reopened = FileKeyValueStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_raw("user").unwrap().as_deref(),
            Some("{\"name\":\"a\"}")
        );

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_write_leaves_entries_unchanged() {
        let path = std::env::temp_dir().join(format!(
            "ttingchu_store_fail_{}.json",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        let _ = fs::remove_file(&path);

        let store = FileKeyValueStore::open(&path).unwrap();
        store.set_raw("kept", "1").unwrap();
        fs::remove_file(&path).unwrap();
        // A directory in place of the file makes every write fail
        fs::create_dir_all(&path).unwrap();

        assert!(matches!(store.set_raw("a", "1"), Err(StoreError::Io { .. })));
        assert_eq!(store.get_raw("a").unwrap(), None);

        assert!(store.remove("kept").is_err());
        assert_eq!(store.get_raw("kept").unwrap().as_deref(), Some("1"));

        // Cleanup
        let _ = fs::remove_dir_all(&path);
    }

    #[test]
    fn test_encode_error_is_not_reported_as_corrupt_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StoreError::Encode {
            path: PathBuf::from("/tmp/storage.json"),
            source,
        };
        assert_eq!(err.to_string(), "failed to encode storage file \"/tmp/storage.json\"");
    }
}
