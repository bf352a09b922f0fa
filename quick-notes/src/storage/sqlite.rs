//! SQLite-backed key-value store
//!
//! A single `kv_store` table holds one JSON blob per key. Quota accounting
//! uses byte lengths of keys and values, same as the in-memory store.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::{KeyValueStore, check_quota};
use crate::error::{NotesError, NotesResult};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    quota_bytes: Option<usize>,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the table exists
    pub fn open(path: &Path, quota_bytes: Option<usize>) -> NotesResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    NotesError::Storage(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        log::info!("[STORAGE] Opened key-value store at {}", path.display());
        Self::init(conn, quota_bytes)
    }

    /// Non-durable database, handy for tests
    pub fn open_in_memory(quota_bytes: Option<usize>) -> NotesResult<Self> {
        Self::init(Connection::open_in_memory()?, quota_bytes)
    }

    fn init(conn: Connection, quota_bytes: Option<usize>) -> NotesResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            quota_bytes,
        })
    }

    fn lock(&self) -> NotesResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| NotesError::Storage("sqlite connection lock poisoned".to_string()))
    }

    /// Total bytes of all keys and values currently stored
    pub fn used_bytes(&self) -> NotesResult<usize> {
        let conn = self.lock()?;
        Ok(used_bytes(&conn)? as usize)
    }
}

fn used_bytes(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
         FROM kv_store",
        [],
        |row| row.get(0),
    )
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> NotesResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> NotesResult<()> {
        let conn = self.lock()?;

        if self.quota_bytes.is_some() {
            let used = used_bytes(&conn)? as usize;
            let old: Option<i64> = conn
                .query_row(
                    "SELECT LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))
                     FROM kv_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            check_quota(
                self.quota_bytes,
                used,
                old.unwrap_or(0) as usize,
                super::entry_size(key, value),
                key,
            )?;
        }

        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        log::debug!("[STORAGE] Wrote '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> NotesResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}
