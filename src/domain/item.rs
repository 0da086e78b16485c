use crate::domain::column::ColumnId;
use crate::error::TabdeckError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Favicon service used to derive bookmark thumbnails
pub const FAVICON_SERVICE_URL: &str = "https://s2.googleusercontent.com/s2/favicons?domain_url=";

/// Unique identifier for a board item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an item represents. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    Bookmark,
    Note,
    Task,
}

impl ItemKind {
    /// Lower-case label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bookmark => "bookmark",
            Self::Note => "note",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bookmark => write!(f, "Bookmark"),
            Self::Note => write!(f, "Note"),
            Self::Task => write!(f, "Task"),
        }
    }
}

/// Builds the favicon thumbnail address for a bookmark url
pub fn thumbnail_for(url: &str) -> String {
    format!("{}{}", FAVICON_SERVICE_URL, url)
}

/// A bookmark, note or task living in exactly one column.
///
/// Field names follow the persisted layout: `type` holds the kind and `img`
/// holds the derived thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    fn new(kind: ItemKind, column_id: ColumnId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: ItemId::new(),
            column_id,
            title,
            content: None,
            url: None,
            kind,
            thumbnail_url: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a bookmark; the thumbnail is derived from the url
    pub fn new_bookmark(column_id: ColumnId, title: String, url: String) -> Self {
        let mut item = Self::new(ItemKind::Bookmark, column_id, title);
        item.thumbnail_url = Some(thumbnail_for(&url));
        item.url = Some(url);
        item
    }

    pub fn new_note(column_id: ColumnId, title: String) -> Self {
        Self::new(ItemKind::Note, column_id, title)
    }

    pub fn new_task(column_id: ColumnId, title: String) -> Self {
        Self::new(ItemKind::Task, column_id, title)
    }

    /// Sets the initial content, leaving timestamps alone
    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content.filter(|c| !c.is_empty());
        self
    }

    pub fn is_bookmark(&self) -> bool {
        self.kind == ItemKind::Bookmark
    }

    pub fn is_task(&self) -> bool {
        self.kind == ItemKind::Task
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.touch();
    }

    /// Sets or clears the content
    pub fn set_content(&mut self, content: Option<String>) {
        self.content = content.filter(|c| !c.is_empty());
        self.touch();
    }

    /// Changes a bookmark's url and re-derives its thumbnail
    pub fn set_url(&mut self, url: String) -> Result<(), TabdeckError> {
        self.require_kind(ItemKind::Bookmark, "set url")?;
        self.thumbnail_url = Some(thumbnail_for(&url));
        self.url = Some(url);
        self.touch();
        Ok(())
    }

    /// Marks a task complete or incomplete
    pub fn set_completed(&mut self, completed: bool) -> Result<(), TabdeckError> {
        self.require_kind(ItemKind::Task, "set completion")?;
        self.is_completed = completed;
        self.touch();
        Ok(())
    }

    pub fn toggle_completed(&mut self) -> Result<(), TabdeckError> {
        let completed = !self.is_completed;
        self.set_completed(completed)
    }

    fn require_kind(&self, kind: ItemKind, operation: &str) -> Result<(), TabdeckError> {
        if self.kind != kind {
            return Err(TabdeckError::InvalidOperation {
                kind: self.kind.label().to_string(),
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
