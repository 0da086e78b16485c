use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Persisted collections. Each key holds one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Columns,
    Items,
    Settings,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [Self::Columns, Self::Items, Self::Settings];

    /// Key name in the persisted layout (`tasks` holds every item kind)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Columns => "cols",
            Self::Items => "tasks",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key-value persistence substrate mirrored by the store
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initializes the storage backend
    async fn initialize(&self) -> Result<()>;

    /// Reads the raw JSON stored under a key, if any
    async fn read(&self, key: StorageKey) -> Result<Option<String>>;

    /// Replaces the raw JSON stored under a key
    async fn write(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Removes a key; removing a missing key is not an error
    async fn remove(&self, key: StorageKey) -> Result<()>;

    /// Checks if the backend has been initialized
    async fn is_initialized(&self) -> bool;
}
