//! Key/value persistence for player progress.
//!
//! Values are JSON documents. A [`Storage`] reports failures, but gameplay
//! never sees them: [`load_or_default`] and [`save_or_warn`] log at `warn`
//! and carry on with in-memory state.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keys become file names, so path separators and the like are refused.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A key/value store of JSON documents.
pub trait Storage {
    /// The value under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// Lossy helpers
// ---------------------------------------------------------------------------

/// Read and decode `key`, falling back to `T::default()` on any failure.
pub fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    match storage.get(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|error| {
            warn!(key, %error, "stored value is malformed, starting empty");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(error) => {
            warn!(key, %error, "failed to read progress, starting empty");
            T::default()
        }
    }
}

/// Encode and write `value`. Returns whether the write succeeded.
pub fn save_or_warn<T, S>(storage: &mut S, key: &str, value: &T) -> bool
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let result = serde_json::to_value(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, json));
    match result {
        Ok(()) => true,
        Err(error) => {
            warn!(key, %error, "failed to save progress");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// One pretty-printed `{key}.json` per key in a directory.
///
/// Writes go to a temporary file first and are then renamed into place.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Open `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|source| StorageError::DirectoryCreation {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let temp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&temp, serde_json::to_string_pretty(&value)?)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "turing_storage_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    /// Always fails, like a full disk or a blocked browser store.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<Value>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("unavailable")))
        }

        fn set(&mut self, _key: &str, _value: Value) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("unavailable")))
        }
    }

    #[test]
    fn memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("achievements").unwrap(), None);
        storage.set("achievements", json!(["golden_1"])).unwrap();
        assert_eq!(storage.get("achievements").unwrap(), Some(json!(["golden_1"])));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn file_storage_persists_across_instances() {
        let dir = make_test_dir("persist");
        let mut storage = JsonFileStorage::open(&dir).unwrap();
        storage.set("best_medals", json!({ "1": "gold" })).unwrap();

        let reopened = JsonFileStorage::open(&dir).unwrap();
        assert_eq!(reopened.get("best_medals").unwrap(), Some(json!({ "1": "gold" })));
        assert!(!dir.join(".best_medals.json.tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let dir = make_test_dir("keys");
        let mut storage = JsonFileStorage::open(&dir).unwrap();
        assert!(matches!(
            storage.set("../escape", json!(1)),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get(""), Err(StorageError::InvalidKey(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_an_error_but_loads_as_default() {
        let dir = make_test_dir("corrupt");
        let storage = JsonFileStorage::open(&dir).unwrap();
        std::fs::write(dir.join("achievements.json"), "{ nope").unwrap();
        assert!(matches!(
            storage.get("achievements"),
            Err(StorageError::Serialization(_))
        ));
        let ids: Vec<String> = load_or_default(&storage, "achievements");
        assert!(ids.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failures_are_swallowed() {
        let ids: Vec<String> = load_or_default(&BrokenStorage, "achievements");
        assert!(ids.is_empty());
        assert!(!save_or_warn(&mut BrokenStorage, "achievements", &ids));
    }

    #[test]
    fn wrong_shape_loads_as_default() {
        let mut storage = MemoryStorage::new();
        storage.set("achievements", json!(42)).unwrap();
        let ids: Vec<String> = load_or_default(&storage, "achievements");
        assert!(ids.is_empty());
    }
}
