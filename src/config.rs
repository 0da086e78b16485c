use crate::error::{Result, TabdeckError};
use crate::storage::StorageKey;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest debounce window accepted from configuration
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Per-collection debounce windows, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub columns_ms: u64,
    pub items_ms: u64,
    pub settings_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            columns_ms: 2000,
            items_ms: 2000,
            settings_ms: 1000,
        }
    }
}

impl DebounceConfig {
    /// Debounce window for a storage key
    pub fn delay_for(&self, key: StorageKey) -> Duration {
        let ms = match key {
            StorageKey::Columns => self.columns_ms,
            StorageKey::Items => self.items_ms,
            StorageKey::Settings => self.settings_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Store configuration, usually read from `tabdeck.toml`
///
/// ```toml
/// data_dir = "/home/me/.local/share/tabdeck"
///
/// [debounce]
/// items_ms = 1500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for file-backed storage; `None` means the working directory
    pub data_dir: Option<PathBuf>,
    pub debounce: DebounceConfig,
}

impl StoreConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: StoreConfig =
            toml::from_str(contents).map_err(|e| TabdeckError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML config file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for key in StorageKey::ALL {
            let window = self.debounce.delay_for(key);
            if window > Duration::from_millis(MAX_DEBOUNCE_MS) {
                return Err(TabdeckError::ConfigError(format!(
                    "debounce window for '{}' is {}ms, maximum is {}ms",
                    key,
                    window.as_millis(),
                    MAX_DEBOUNCE_MS
                )));
            }
        }
        Ok(())
    }

    /// Resolved storage directory
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
