//! Editor-side constraints for columns and items.
//!
//! Drafts and edits are validated in full before anything is mutated, so a
//! rejected form never leaves a half-applied change behind.

use crate::domain::column::ColumnId;
use crate::domain::item::{Item, ItemKind};
use crate::error::{Result, TabdeckError};
use url::Url;

/// Length limits count UTF-16 code units, matching the browser form limits
/// records were originally checked against.
pub const MAX_TITLE_CHARS: usize = 40;
pub const MAX_BOOKMARK_CONTENT_CHARS: usize = 100;
pub const MAX_TEXT_CONTENT_CHARS: usize = 2000;

fn input_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Checks a column or item title
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(TabdeckError::validation("title", "Title is required"));
    }
    if input_len(title) > MAX_TITLE_CHARS {
        return Err(TabdeckError::validation("title", "Title is too long"));
    }
    Ok(())
}

/// Checks item content against the limit for its kind
pub fn validate_content(kind: ItemKind, content: Option<&str>) -> Result<()> {
    let limit = match kind {
        ItemKind::Bookmark => MAX_BOOKMARK_CONTENT_CHARS,
        ItemKind::Note | ItemKind::Task => MAX_TEXT_CONTENT_CHARS,
    };
    match content {
        Some(c) if input_len(c) > limit => {
            Err(TabdeckError::validation("content", "Content is too long"))
        }
        _ => Ok(()),
    }
}

/// Checks that a bookmark url is present and absolute
pub fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(TabdeckError::validation("url", "URL is required"));
    }
    Url::parse(url).map_err(|_| TabdeckError::validation("url", "Invalid URL"))?;
    Ok(())
}

/// Form input for a new item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDraft {
    Bookmark {
        title: String,
        content: Option<String>,
        url: String,
    },
    Note {
        title: String,
        content: Option<String>,
    },
    Task {
        title: String,
        content: Option<String>,
    },
}

impl ItemDraft {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Bookmark { .. } => ItemKind::Bookmark,
            Self::Note { .. } => ItemKind::Note,
            Self::Task { .. } => ItemKind::Task,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bookmark {
                title,
                content,
                url,
            } => {
                validate_title(title)?;
                validate_content(ItemKind::Bookmark, content.as_deref())?;
                validate_url(url)
            }
            Self::Note { title, content } | Self::Task { title, content } => {
                validate_title(title)?;
                validate_content(self.kind(), content.as_deref())
            }
        }
    }

    /// Validates the draft and builds the item with a fresh id and timestamps
    pub fn into_item(self, column_id: ColumnId) -> Result<Item> {
        self.validate()?;
        let item = match self {
            Self::Bookmark {
                title,
                content,
                url,
            } => Item::new_bookmark(column_id, title, url).with_content(content),
            Self::Note { title, content } => Item::new_note(column_id, title).with_content(content),
            Self::Task { title, content } => Item::new_task(column_id, title).with_content(content),
        };
        Ok(item)
    }
}

/// Partial update submitted by an item editor.
///
/// `None` leaves a field untouched; `Some(String::new())` for `content`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

impl ItemEdit {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.url.is_none()
    }

    /// Validates the whole edit against the item's kind, then applies it
    pub fn apply_to(&self, item: &mut Item) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_content(item.kind, self.content.as_deref())?;
        if let Some(url) = &self.url {
            if item.kind != ItemKind::Bookmark {
                return Err(TabdeckError::InvalidOperation {
                    kind: item.kind.label().to_string(),
                    operation: "set url".to_string(),
                });
            }
            validate_url(url)?;
        }

        if let Some(title) = &self.title {
            item.set_title(title.clone());
        }
        if let Some(content) = &self.content {
            item.set_content(Some(content.clone()));
        }
        if let Some(url) = &self.url {
            item.set_url(url.clone())?;
        }
        Ok(())
    }
}
