//! Export and import of the board as a single JSON document.

use super::Store;
use crate::{
    domain::{Column, Item},
    error::{Result, TabdeckError},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File name used for exports
pub const EXPORT_FILE_NAME: &str = "data.json";

/// Columns and items as one document: `{ "cols": [...], "tasks": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: Vec<Column>,
    pub tasks: Vec<Item>,
}

impl Snapshot {
    /// Parses an import payload.
    ///
    /// Both `cols` and `tasks` must be present and must be arrays; any
    /// malformed record rejects the whole payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| TabdeckError::InvalidImport(format!("not valid JSON: {e}")))?;

        let object = value
            .as_object()
            .ok_or_else(|| TabdeckError::InvalidImport("expected a JSON object".to_string()))?;
        for field in ["cols", "tasks"] {
            match object.get(field) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(TabdeckError::InvalidImport(format!(
                        "'{field}' must be an array"
                    )))
                }
                None => {
                    return Err(TabdeckError::InvalidImport(format!(
                        "missing '{field}' array"
                    )))
                }
            }
        }

        serde_json::from_value(value)
            .map_err(|e| TabdeckError::InvalidImport(format!("malformed record: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Store {
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            cols: self.columns.clone(),
            tasks: self.items.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_snapshot().to_json()
    }

    /// Writes `data.json` into `dir` and returns its path
    pub async fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        fs::write(&path, self.export_json()?).await?;
        tracing::info!(path = %path.display(), "board exported");
        Ok(path)
    }

    /// Replaces columns and items together
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        let columns = snapshot.cols.len();
        let items = snapshot.tasks.len();
        self.replace_columns(snapshot.cols)?;
        self.replace_items(snapshot.tasks)?;
        tracing::info!(columns, items, "board imported");
        Ok(())
    }

    /// Validates a payload and imports it; on error nothing changes
    pub fn import_json(&mut self, payload: &str) -> Result<()> {
        let snapshot = Snapshot::from_json(payload).map_err(|e| {
            tracing::warn!(error = %e, "import rejected");
            e
        })?;
        self.import_snapshot(snapshot)
    }

    /// Imports a `.json` file
    pub async fn import_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            return Err(TabdeckError::InvalidImport(format!(
                "{} is not a .json file",
                path.display()
            )));
        }

        let payload = fs::read_to_string(path).await?;
        self.import_json(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::StoreConfig,
        domain::ItemDraft,
        storage::{MemoryStorage, Storage, StorageKey},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn open_store(storage: &Arc<MemoryStorage>) -> Store {
        let storage: Arc<dyn Storage> = storage.clone();
        Store::open(storage, &StoreConfig::default()).await.unwrap()
    }

    async fn populated(storage: &Arc<MemoryStorage>) -> Store {
        let mut store = open_store(storage).await;
        let links = store.add_column("Links").unwrap();
        let todo = store.add_column("Todo").unwrap();
        store
            .add_item(
                &links,
                ItemDraft::Bookmark {
                    title: "Rust".to_string(),
                    content: Some("home".to_string()),
                    url: "https://www.rust-lang.org".to_string(),
                },
            )
            .unwrap();
        let task = store
            .add_item(
                &todo,
                ItemDraft::Task {
                    title: "Backup".to_string(),
                    content: None,
                },
            )
            .unwrap();
        store.toggle_item_completed(&task).unwrap();
        store
    }

    #[test]
    fn test_rejects_non_array_cols() {
        let err = Snapshot::from_json(r#"{"cols": {}, "tasks": []}"#).unwrap_err();
        assert!(matches!(err, TabdeckError::InvalidImport(_)));
        assert!(err.to_string().contains("'cols' must be an array"));
    }

    #[test]
    fn test_rejects_missing_tasks() {
        let err = Snapshot::from_json(r#"{"cols": []}"#).unwrap_err();
        assert!(err.to_string().contains("missing 'tasks'"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Snapshot::from_json("not json").is_err());
        assert!(Snapshot::from_json("[]").is_err());
        assert!(Snapshot::from_json(r#"{"cols": [{"title": 3}], "tasks": []}"#).is_err());
    }

    #[test]
    fn test_accepts_empty_board() {
        let snapshot = Snapshot::from_json(r#"{"cols": [], "tasks": []}"#).unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_import_leaves_state_untouched() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = populated(&storage).await;
        store.flush().await.unwrap();

        let columns_before = store.columns().to_vec();
        let stored_cols = storage.get(StorageKey::Columns);
        let stored_tasks = storage.get(StorageKey::Items);

        assert!(store.import_json(r#"{"cols": {}, "tasks": []}"#).is_err());

        assert_eq!(store.columns(), columns_before.as_slice());
        assert!(!store.has_pending_writes());
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(storage.get(StorageKey::Columns), stored_cols);
        assert_eq!(storage.get(StorageKey::Items), stored_tasks);
    }

    #[tokio::test]
    async fn test_export_then_import_round_trips() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = populated(&storage).await;
        let before = store.export_snapshot();

        let json = store.export_json().unwrap();
        store.import_json(&json).unwrap();

        assert_eq!(store.export_snapshot(), before);
    }

    #[tokio::test]
    async fn test_import_replaces_both_collections() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = populated(&storage).await;

        store.import_json(r#"{"cols": [{"id": "n", "title": "New"}], "tasks": []}"#).unwrap();

        assert_eq!(store.columns().len(), 1);
        assert_eq!(store.columns()[0].title, "New");
        assert!(store.items().is_empty());
        assert!(store.is_pending(StorageKey::Columns));
        assert!(store.is_pending(StorageKey::Items));
    }

    #[tokio::test]
    async fn test_export_and_import_files() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(MemoryStorage::new());
        let source = populated(&storage).await;

        let path = source.export_to_dir(dir.path()).await.unwrap();
        assert!(path.ends_with("data.json"));

        let other = Arc::new(MemoryStorage::new());
        let mut target = open_store(&other).await;
        target.import_file(&path).await.unwrap();
        assert_eq!(target.export_snapshot(), source.export_snapshot());

        let txt = dir.path().join("data.txt");
        std::fs::write(&txt, "{}").unwrap();
        let err = target.import_file(&txt).await.unwrap_err();
        assert!(matches!(err, TabdeckError::InvalidImport(_)));
    }
}
