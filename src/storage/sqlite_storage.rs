use crate::{
    error::{Result, TabdeckError},
    storage::{Storage, StorageKey},
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed key-value storage
pub struct SqliteStorage {
    connection: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at the given path
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(database_path).map_err(storage_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens a private in-memory database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| TabdeckError::StorageError("SQLite connection lock poisoned".to_string()))
    }
}

fn storage_error(err: rusqlite::Error) -> TabdeckError {
    TabdeckError::StorageError(err.to_string())
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn initialize(&self) -> Result<()> {
        self.conn()?
            .execute(
                "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
                [],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    async fn read(&self, key: StorageKey) -> Result<Option<String>> {
        self.conn()?
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)
    }

    async fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key.as_str(), value],
            )
            .map_err(storage_error)?;
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key.as_str()])
            .map_err(storage_error)?;
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        let Ok(conn) = self.conn() else {
            return false;
        };
        conn.query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv'",
            [],
            |_| Ok(()),
        )
        .optional()
        .map(|found| found.is_some())
        .unwrap_or(false)
    }
}
