use thiserror::Error;

pub type Result<T> = std::result::Result<T, TabdeckError>;

#[derive(Debug, Error)]
pub enum TabdeckError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Operation not supported for {kind}: {operation}")]
    InvalidOperation { kind: String, operation: String },

    #[error("Invalid import: {0}")]
    InvalidImport(String),

    #[error("Invalid drag transition: cannot {action} while {state}")]
    InvalidDragTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Other(String),
}

impl TabdeckError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// True for errors a user can fix by re-submitting the form.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// True for edits or deletes that referenced a stale id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_) | Self::ItemNotFound(_))
    }
}
