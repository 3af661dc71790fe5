// src/app/snapshot.rs
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::data::{collect_by_id, CatalogState};
use super::error::StoreError;
use super::types::{Genre, GenreId, Movie, RatingFilter};

pub const SNAPSHOT_KEY: &str = "movie-storage";

/// Durable key-value store for serialized catalog state.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Persisted form of [`CatalogState`]. The loading flag is never part of it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub genre_filter: Option<GenreId>,
    #[serde(default)]
    pub rating_filter: RatingFilter,
    #[serde(default)]
    pub page_cursor: u32,
}

impl CatalogSnapshot {
    pub fn capture(state: &CatalogState) -> Self {
        Self {
            movies: state.movies.values().cloned().collect(),
            genres: state.genres.clone(),
            genre_filter: state.genre_filter,
            rating_filter: state.rating_filter,
            page_cursor: state.page_cursor,
        }
    }

    pub fn into_state(self) -> CatalogState {
        CatalogState {
            movies: collect_by_id(self.movies),
            genres: self.genres,
            genre_filter: self.genre_filter,
            rating_filter: self.rating_filter,
            page_cursor: self.page_cursor,
        }
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string(self).map_err(StoreError::Encode)
    }

    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(StoreError::Decode)
    }
}

pub fn load_snapshot(store: &dyn SnapshotStore) -> Result<Option<CatalogSnapshot>, StoreError> {
    match store.load(SNAPSHOT_KEY)? {
        Some(raw) => CatalogSnapshot::from_json(&raw).map(Some),
        None => Ok(None),
    }
}

pub fn save_snapshot(store: &dyn SnapshotStore, snapshot: &CatalogSnapshot) -> Result<(), StoreError> {
    store.save(SNAPSHOT_KEY, &snapshot.to_json()?)
}

// ---- SQLite ----
const SQL_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS kv_snapshots (
  key        TEXT PRIMARY KEY,
  value      TEXT NOT NULL,
  updated_at TEXT NOT NULL
)
"#;

const SQL_UPSERT: &str = r#"
INSERT INTO kv_snapshots (key, value, updated_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
"#;

pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SQL_CREATE)?;
        info!("Opened snapshot store {}", path.display());
        Ok(Self { conn })
    }

    /// Open an existing store without creating or altering anything.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SQL_CREATE)?;
        Ok(Self { conn })
    }

    /// RFC 3339 time of the last write under `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_snapshots ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_snapshots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let stamp = chrono::Utc::now().to_rfc3339();
        self.conn.execute(SQL_UPSERT, params![key, value, stamp])?;
        Ok(())
    }
}

// ---- in-process ----
/// Shared map store; clones see the same entries.
#[derive(Clone, Default)]
pub struct MemorySnapshotStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.put(key, value);
        store
    }

    fn put(&self, key: &str, value: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        map.insert(key.to_string(), value.to_string());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put(key, value);
        Ok(())
    }
}
