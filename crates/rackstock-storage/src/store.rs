//! Key-value stores backing the persistence bridge.

use crate::error::StorageError;
use log::{debug, info};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Minimal string key-value store, the local-storage equivalent the
/// inventory is persisted into.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed store writing one `<key>.json` file per key under a root
/// directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store under the given root, creating the directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("initialized file key-value store (root={})", root.display());
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json.tmp"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("read stored value (key={}, len={})", key, contents.len());
                Ok(Some(contents))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the value atomically through a temp file and rename.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        let temp_path = self.temp_path(key);
        {
            let mut file = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        std::fs::rename(temp_path, path)?;
        debug!("stored value (key={}, len={})", key, value.len());
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Process-local store, used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.lock().insert(key.into(), value.into());
        self
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
    use crate::StorageError;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn file_store_round_trips_and_overwrites() {
        let temp = tempdir().expect("tempdir");
        let store = FileKeyValueStore::new(temp.path().join("nested")).expect("store");
        assert_eq!(store.get("idc_inventory").expect("get"), None);

        store.set("idc_inventory", "[1]").expect("set");
        store.set("idc_inventory", "[2]").expect("set");
        assert_eq!(
            store.get("idc_inventory").expect("get").as_deref(),
            Some("[2]")
        );
        assert!(!temp.path().join("nested/idc_inventory.json.tmp").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let temp = tempdir().expect("tempdir");
        let store = FileKeyValueStore::new(temp.path()).expect("store");
        let err = store.set("../escape", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[test]
    fn memory_store_keeps_latest_value() {
        let store = MemoryKeyValueStore::new().with_value("a", "1");
        store.set("a", "2").expect("set");
        assert_eq!(store.get("a").expect("get").as_deref(), Some("2"));
        assert_eq!(store.get("b").expect("get"), None);
    }
}
