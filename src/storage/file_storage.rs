use crate::{
    error::Result,
    storage::{Storage, StorageKey},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage: one JSON file per key under `.tabdeck/`
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const TABDECK_DIR: &'static str = ".tabdeck";

    /// Creates a new FileStorage rooted at the given data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            root_path: data_dir.as_ref().join(Self::TABDECK_DIR),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn key_file(&self, key: StorageKey) -> PathBuf {
        self.root_path.join(format!("{}.json", key.as_str()))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await
    }

    async fn read(&self, key: StorageKey) -> Result<Option<String>> {
        let file_path = self.key_file(key);

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn write(&self, key: StorageKey, value: &str) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        // Readers never observe a partially written document
        let file_path = self.key_file(key);
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &file_path).await?;

        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<()> {
        let file_path = self.key_file(key);

        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists()
    }
}
