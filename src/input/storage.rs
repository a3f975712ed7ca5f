//! Local key-value storage for user preferences.
//!
//! Mirrors the browser's `localStorage`: string keys, string values, and the possibility
//! that storage is disabled altogether.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage is disabled or blocked.
    #[error("Local storage is unavailable")]
    Unavailable,

    #[error("Failed to access storage file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Volatile storage, optionally simulating disabled storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// Stored items.
    items: HashMap<String, String>,
    /// When set, every access fails with [`StorageError::Unavailable`].
    blocked: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every access, as with cookies/site data disabled.
    #[must_use]
    pub fn blocked() -> Self {
        Self { items: HashMap::new(), blocked: true }
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.blocked {
            return Err(StorageError::Unavailable);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.blocked {
            return Err(StorageError::Unavailable);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Path of the JSON file.
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every item; a missing file is an empty store.
    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        tracing::debug!("Stored '{}' in {:?}", key, self.path);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    #[rstest]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();

        assert!(storage.get_item("idioma").unwrap().is_none());
        storage.set_item("idioma", "en").unwrap();
        assert_eq!(storage.get_item("idioma").unwrap().as_deref(), Some("en"));
    }

    #[rstest]
    fn test_blocked_storage_rejects_access() {
        let mut storage = MemoryStorage::blocked();

        assert!(matches!(storage.get_item("idioma"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.set_item("idioma", "en"), Err(StorageError::Unavailable)));
    }

    /// ファイルが存在しない場合は空として扱う
    #[rstest]
    fn test_file_storage_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("storage.json"));

        assert!(storage.get_item("idioma").unwrap().is_none());
    }

    #[rstest]
    fn test_file_storage_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        FileStorage::new(&path).set_item("idioma", "es").unwrap();
        FileStorage::new(&path).set_item("theme", "dark").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("idioma").unwrap().as_deref(), Some("es"));
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[googletest::test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let result = FileStorage::new(&path).get_item("idioma");

        assert_that!(result, err(displays_as(contains_substring("corrupt"))));
    }

    #[rstest]
    fn test_file_storage_unwritable_location_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path().join("missing-dir").join("s.json"));

        assert!(storage.set_item("idioma", "en").is_err());
    }
}
