//! Persisted key-value state store.
//!
//! A single JSON document on disk holding JSON-encoded values per key:
//! the dashboard target list, rotation settings, backend preferences, and
//! the companion read-only surface. Decode failures are never surfaced;
//! corrupt or missing state silently yields defaults.

mod error;

pub use error::StoreError;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Well-known store keys.
pub mod keys {
    pub const TARGETS: &str = "dashboard.targets";
    pub const SETTINGS: &str = "rotation.settings";
    pub const BACKEND_PREFS: &str = "backend.preferences";

    // Companion read-only surface, consumed by a separate presentation
    // extension; refreshed whenever rotation state changes.
    pub const CURRENT_DASHBOARD_URL: &str = "shelf.current_dashboard_url";
    pub const ROTATION_ENABLED: &str = "shelf.rotation_enabled";
    pub const SAVED_DASHBOARDS: &str = "shelf.saved_dashboards";
}

pub struct StateStore {
    path: PathBuf,
    doc: RwLock<BTreeMap<String, Value>>,
}

impl StateStore {
    /// Open the store at `path`, falling back to the platform data directory.
    ///
    /// A missing or unparseable file yields an empty store.
    pub fn open(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(Self::default_path);
        let doc = Self::read_document(&path);
        Self {
            path,
            doc: RwLock::new(doc),
        }
    }

    /// Default location: `<platform data dir>/carousel/state.json`.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("io", "carousel", "carousel")
            .map(|dirs| dirs.data_dir().join("state.json"))
            .unwrap_or_else(|| PathBuf::from("/tmp/carousel/state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(path: &Path) -> BTreeMap<String, Value> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Persisted state is corrupt, starting from defaults"
                );
                BTreeMap::new()
            }
        }
    }

    /// Read and decode the value at `key`. Any decode failure yields `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let doc = self.doc.read().expect("lock poisoned");
        let value = doc.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    /// Encode and store `value` at `key`, rewriting the document on disk.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value)?;
        let mut doc = self.doc.write().expect("lock poisoned");
        doc.insert(key.to_string(), encoded);
        self.write_document(&doc)
    }

    /// Remove the value at `key`, if present.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut doc = self.doc.write().expect("lock poisoned");
        if doc.remove(key).is_some() {
            self.write_document(&doc)?;
        }
        Ok(())
    }

    fn write_document(&self, doc: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        label: String,
        count: u32,
    }

    fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(Some(dir.path().join("state.json")));
        (dir, store)
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get::<Sample>("nope"), None);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let (_dir, store) = temp_store();
        let sample = Sample {
            label: "ops".to_string(),
            count: 3,
        };
        store.set("sample", &sample).unwrap();
        assert_eq!(store.get::<Sample>("sample"), Some(sample));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = StateStore::open(Some(path.clone()));
        store.set("answer", &42u32).unwrap();
        drop(store);

        let reopened = StateStore::open(Some(path));
        assert_eq!(reopened.get::<u32>("answer"), Some(42));
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = StateStore::open(Some(path));
        assert_eq!(store.get::<u32>("answer"), None);
    }

    #[test]
    fn test_wrong_type_decodes_to_none() {
        let (_dir, store) = temp_store();
        store.set("answer", &"not a number").unwrap();
        assert_eq!(store.get::<u32>("answer"), None);
    }

    #[test]
    fn test_remove_deletes_key() {
        let (_dir, store) = temp_store();
        store.set("answer", &42u32).unwrap();
        store.remove("answer").unwrap();
        assert_eq!(store.get::<u32>("answer"), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("state.json");
        let store = StateStore::open(Some(path.clone()));
        store.set("answer", &1u32).unwrap();
        assert!(path.exists());
    }
}
