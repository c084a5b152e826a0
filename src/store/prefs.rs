// Key-value store backends.
// Defines the string store port and its in-memory and JSON-file implementations.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::error::{Result, WidgetError};

/// A flat string-to-string store persisted across restarts.
///
/// Readers treat every lookup as fresh: implementations must not hide
/// writes made by other processes behind their own cache.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys read as `None`.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set_string(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store, used by tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| WidgetError::Other("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is re-read on every lookup so values written by the shell are
/// visible immediately. Non-string JSON values read as their JSON text.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole backing object. A missing file is an empty store.
    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(WidgetError::Other(format!(
                "store file {} is not a JSON object",
                self.path.display()
            ))),
        }
    }

    /// Replace the backing object atomically via a temp file.
    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(map)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        let map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "store read failed");
                return None;
            }
        };

        match map.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .write()
            .map_err(|_| WidgetError::Other("file store lock poisoned".to_string()))?;

        let mut map = self.read_map()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_map(&map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_set_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_string("missing"), None);

        store.set_string("flutter.account", "u1").unwrap();
        store.set_string("flutter.account", "u2").unwrap();

        assert_eq!(store.get_string("flutter.account"), Some("u2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");
        let store = FileStore::new(&path);

        store.set_string("flutter.account", "u1").unwrap();
        store.set_string("flutter.theme_mode", "ThemeMode.dark").unwrap();

        assert!(path.exists());
        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get_string("flutter.account"), Some("u1".to_string()));
        assert_eq!(
            reopened.get_string("flutter.theme_mode"),
            Some("ThemeMode.dark".to_string())
        );
    }

    #[test]
    fn test_file_store_sees_external_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        let store = FileStore::new(&path);

        assert_eq!(store.get_string("flutter.account"), None);

        fs::write(&path, r#"{"flutter.account": "u9", "flutter.count": 3, "x": null}"#).unwrap();

        assert_eq!(store.get_string("flutter.account"), Some("u9".to_string()));
        assert_eq!(store.get_string("flutter.count"), Some("3".to_string()));
        assert_eq!(store.get_string("x"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get_string("flutter.account"), None);
        assert!(store.set_string("flutter.account", "u1").is_err());
    }
}
