//! Persistence adapter over a local key-value store.
//!
//! Values are stored as JSON text under string keys. Reads never fail: a
//! missing key, a JSON `null`, or bytes that do not parse as the expected
//! structure all yield the caller's fallback. Writes surface backend
//! rejections (quota, SQLite errors) as `NotesError::Storage`.

pub mod memory;
pub mod sqlite;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{NotesError, NotesResult};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Raw string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> NotesResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> NotesResult<()>;
    fn remove(&self, key: &str) -> NotesResult<()>;
}

/// Bytes a single entry occupies against a quota (key plus value).
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Check that replacing `old_entry` bytes with `new_entry` bytes stays within `quota`.
pub(crate) fn check_quota(
    quota: Option<usize>,
    used: usize,
    old_entry: usize,
    new_entry: usize,
    key: &str,
) -> NotesResult<()> {
    let Some(limit) = quota else {
        return Ok(());
    };
    let projected = used.saturating_sub(old_entry) + new_entry;
    if projected > limit {
        return Err(NotesError::Storage(format!(
            "quota exceeded writing '{}': {} bytes needed, limit is {}",
            key, projected, limit
        )));
    }
    Ok(())
}

/// Typed JSON access on top of a [`KeyValueStore`].
pub struct PersistenceAdapter {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Adapter over a fresh in-memory store without a quota.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(None))
    }

    /// The underlying raw store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Read the value stored under `key`, or `fallback` when it is absent or malformed.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                log::warn!("[STORAGE] Failed to read '{}': {}, using fallback", key, e);
                return fallback;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[STORAGE] '{}' is not valid JSON ({}), using fallback", key, e);
                return fallback;
            }
        };
        if value.is_null() {
            return fallback;
        }

        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("[STORAGE] '{}' has an unexpected shape ({}), using fallback", key, e);
                fallback
            }
        }
    }

    /// Serialize `value` as JSON and store it under `key`.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> NotesResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).inspect_err(|e| {
            log::error!("[STORAGE] Write of '{}' rejected: {}", key, e);
        })
    }

    pub fn remove(&self, key: &str) -> NotesResult<()> {
        self.store.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Folder, ThemePreference};
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_round_trip() {
        let adapter = PersistenceAdapter::in_memory();
        let folders = vec![
            Folder::new("Work", "#3b82f6").unwrap(),
            Folder::new("Ideas", "hsl(12, 70%, 60%)").unwrap(),
        ];

        adapter.write("qn_folders", &folders).unwrap();
        let loaded: Vec<Folder> = adapter.read("qn_folders", Vec::new());
        assert_eq!(loaded, folders);
    }

    #[test]
    fn test_read_unwritten_key_returns_fallback() {
        let adapter = PersistenceAdapter::in_memory();
        let theme = adapter.read("qn_theme", ThemePreference { dark: false });
        assert_eq!(theme, ThemePreference { dark: false });
    }

    #[test]
    fn test_malformed_data_returns_fallback() {
        let adapter = PersistenceAdapter::in_memory();

        adapter.store().set("qn_folders", "{not json").unwrap();
        let folders: Vec<Folder> = adapter.read("qn_folders", Vec::new());
        assert!(folders.is_empty());

        // Valid JSON, wrong shape
        adapter.store().set("qn_theme", r#"["dark"]"#).unwrap();
        assert_eq!(adapter.read("qn_theme", ThemePreference::default()), ThemePreference::default());

        // Stored null counts as absent
        adapter.store().set("qn_color", "null").unwrap();
        assert_eq!(adapter.read("qn_color", "#7c3aed".to_string()), "#7c3aed");
    }

    #[test]
    fn test_write_surfaces_quota_rejection() {
        let adapter = PersistenceAdapter::new(MemoryStore::new(Some(32)));
        adapter.write("k", "short").unwrap();

        let err = adapter.write("k", &"x".repeat(64)).unwrap_err();
        assert!(err.is_storage());

        // Previous value survives the rejected write
        assert_eq!(adapter.read("k", String::new()), "short");
    }

    #[test]
    fn test_remove_then_read_returns_fallback() {
        let adapter = PersistenceAdapter::in_memory();
        adapter.write("qn_color", "#123456").unwrap();
        adapter.remove("qn_color").unwrap();
        assert_eq!(adapter.read("qn_color", "fallback".to_string()), "fallback");
    }

    #[test]
    fn test_sqlite_backed_adapter_survives_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("notes.db");

        {
            let adapter = PersistenceAdapter::new(SqliteStore::open(&db_path, None).unwrap());
            adapter.write("qn_theme", &ThemePreference { dark: false }).unwrap();
        }

        let adapter = PersistenceAdapter::new(SqliteStore::open(&db_path, None).unwrap());
        let theme = adapter.read("qn_theme", ThemePreference::default());
        assert!(!theme.dark);
    }

    #[test]
    fn test_check_quota_math() {
        assert!(check_quota(None, 1_000, 0, 1_000_000, "k").is_ok());
        assert!(check_quota(Some(10), 8, 4, 6, "k").is_ok());
        assert!(check_quota(Some(10), 8, 0, 3, "k").is_err());
    }
}
