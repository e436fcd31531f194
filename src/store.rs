use crate::{error::Result, leaderboard::LeaderboardEntry};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

pub const LEADERBOARD_KEY: &str = "typingGameLeaderboard";
pub const SOUND_KEY: &str = "typingGameSoundEnabled";

/// Minimal string key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// SQLite-backed key-value store
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// In-process store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        match self.values.lock() {
            Ok(mut values) => f(&mut values),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.with_values(|values| values.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_values(|values| values.insert(key.to_string(), value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_values(|values| values.remove(key));
        Ok(())
    }
}

/// Leaderboard and sound preference persistence on top of a key-value store.
///
/// Reads never fail: anything missing, unreadable or malformed comes back as
/// an empty leaderboard or the default preference.
#[derive(Debug)]
pub struct ProgressStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("could not read '{key}': {e}");
                None
            }
        }
    }

    pub fn read_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let Some(raw) = self.read_raw(LEADERBOARD_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("stored leaderboard is malformed, treating as empty: {e}");
            Vec::new()
        })
    }

    pub fn write_leaderboard(&self, entries: &[LeaderboardEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        self.backend.set(LEADERBOARD_KEY, &json)
    }

    pub fn clear_leaderboard(&self) -> Result<()> {
        self.backend.remove(LEADERBOARD_KEY)
    }

    /// Sound is on unless explicitly turned off.
    pub fn read_sound_preference(&self) -> bool {
        self.read_raw(SOUND_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or(true)
    }

    pub fn write_sound_preference(&self, enabled: bool) -> Result<()> {
        self.backend.set(SOUND_KEY, &serde_json::to_string(&enabled)?)
    }
}

impl ProgressStore<SqliteStore> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(SqliteStore::open(path)?))
    }
}

impl ProgressStore<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}
