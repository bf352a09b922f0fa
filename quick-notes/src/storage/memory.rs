//! In-process key-value store. Nothing survives the process.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, check_quota, entry_size};
use crate::error::{NotesError, NotesResult};

pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new(quota_bytes: Option<usize>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes,
        }
    }

    fn lock(&self) -> NotesResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| NotesError::Storage("memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(None)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> NotesResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> NotesResult<()> {
        let mut entries = self.lock()?;
        let used: usize = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        let old = entries.get(key).map(|v| entry_size(key, v)).unwrap_or(0);
        check_quota(self.quota_bytes, used, old, entry_size(key, value), key)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> NotesResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
