//! The authoritative in-memory board state.
//!
//! The store owns columns, items and settings. Every mutation updates memory
//! synchronously and then schedules a debounced write of the affected
//! collection, serialized at scheduling time. Storage is a mirror that seeds
//! the store once in [`Store::open`]; after that the store is the source of
//! truth until an explicit import.

use crate::{
    config::StoreConfig,
    domain::{Column, Item, Settings},
    error::Result,
    storage::{Storage, StorageKey},
};
#[cfg(feature = "file-storage")]
use crate::storage::FileStorage;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::runtime::Handle;

pub mod debounce;
mod operations;
pub mod snapshot;

pub use debounce::Debouncer;
pub use snapshot::Snapshot;

pub struct Store {
    columns: Vec<Column>,
    items: Vec<Item>,
    settings: Settings,
    storage: Arc<dyn Storage>,
    debouncer: Debouncer,
}

impl Store {
    /// Initializes the backend and seeds the store from it.
    ///
    /// Missing keys start empty (default settings). Must be called from
    /// within a Tokio runtime; debounced writes are spawned onto it.
    pub async fn open(storage: Arc<dyn Storage>, config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        storage.initialize().await?;

        let columns: Vec<Column> = load_or_default(storage.as_ref(), StorageKey::Columns).await?;
        let items: Vec<Item> = load_or_default(storage.as_ref(), StorageKey::Items).await?;
        let settings: Settings = load_or_default(storage.as_ref(), StorageKey::Settings).await?;

        tracing::info!(
            columns = columns.len(),
            items = items.len(),
            "board loaded"
        );

        let debouncer = Debouncer::new(
            Arc::clone(&storage),
            config.debounce.clone(),
            Handle::current(),
        );

        Ok(Self {
            columns,
            items,
            settings,
            storage,
            debouncer,
        })
    }

    /// Opens a store over [`FileStorage`] rooted at the configured data directory
    #[cfg(feature = "file-storage")]
    pub async fn open_file(config: &StoreConfig) -> Result<Self> {
        let data_dir = config.data_dir();
        tracing::debug!(data_dir = %data_dir.display(), "opening file storage");
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(data_dir));
        Self::open(storage, config).await
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the column list.
    ///
    /// Referential integrity is the caller's job: items pointing at removed
    /// columns must already be gone from the item list.
    pub fn replace_columns(&mut self, columns: Vec<Column>) -> Result<()> {
        let json = serde_json::to_string(&columns)?;
        self.columns = columns;
        self.debouncer.schedule(StorageKey::Columns, json);
        tracing::debug!(columns = self.columns.len(), "columns replaced");
        Ok(())
    }

    /// Replaces the item list; relative order defines per-column order
    pub fn replace_items(&mut self, items: Vec<Item>) -> Result<()> {
        let json = serde_json::to_string(&items)?;
        self.items = items;
        self.debouncer.schedule(StorageKey::Items, json);
        tracing::debug!(items = self.items.len(), "items replaced");
        Ok(())
    }

    pub fn replace_settings(&mut self, settings: Settings) -> Result<()> {
        let json = serde_json::to_string(&settings)?;
        self.settings = settings;
        self.debouncer.schedule(StorageKey::Settings, json);
        tracing::debug!(settings = ?self.settings, "settings replaced");
        Ok(())
    }

    /// Re-schedules a write of a collection's current value
    pub fn persist(&self, key: StorageKey) -> Result<()> {
        let json = match key {
            StorageKey::Columns => serde_json::to_string(&self.columns)?,
            StorageKey::Items => serde_json::to_string(&self.items)?,
            StorageKey::Settings => serde_json::to_string(&self.settings)?,
        };
        self.debouncer.schedule(key, json);
        Ok(())
    }

    /// True while any collection has a write waiting on its debounce window
    pub fn has_pending_writes(&self) -> bool {
        !self.debouncer.pending_keys().is_empty()
    }

    pub fn is_pending(&self, key: StorageKey) -> bool {
        self.debouncer.is_pending(key)
    }

    /// Writes every pending collection now. Call before shutting down.
    pub async fn flush(&self) -> Result<()> {
        self.debouncer.flush().await
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

async fn load_or_default<T>(storage: &dyn Storage, key: StorageKey) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match storage.read(key).await? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(T::default()),
    }
}
