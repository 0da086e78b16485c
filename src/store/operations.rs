use super::Store;
use crate::{
    domain::{
        reorder, validation, Column, ColumnId, Item, ItemDraft, ItemEdit, ItemId, Settings,
    },
    error::{Result, TabdeckError},
};

/// Board-level operations used by column and item editors.
///
/// Each operation validates and resolves ids first and only then replaces the
/// affected collections, so a failed call leaves the store untouched.
impl Store {
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Items of one column in display order
    pub fn items_in_column(&self, id: &ColumnId) -> Vec<&Item> {
        reorder::items_in_column(&self.items, id).collect()
    }

    /// Appends a new column
    pub fn add_column(&mut self, title: impl Into<String>) -> Result<ColumnId> {
        let title = title.into();
        validation::validate_title(&title)?;

        let column = Column::new(title);
        let id = column.id.clone();
        let mut columns = self.columns.clone();
        columns.push(column);
        self.replace_columns(columns)?;

        tracing::info!(column = %id, "column added");
        Ok(id)
    }

    pub fn rename_column(&mut self, id: &ColumnId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validation::validate_title(&title)?;

        let index = self.column_index(id)?;
        let mut columns = self.columns.clone();
        columns[index].title = title;
        self.replace_columns(columns)?;

        tracing::info!(column = %id, "column renamed");
        Ok(())
    }

    /// Deletes a column together with every item it holds
    pub fn delete_column(&mut self, id: &ColumnId) -> Result<Column> {
        let index = self.column_index(id)?;

        let mut columns = self.columns.clone();
        let removed = columns.remove(index);
        let before = self.items.len();
        let items: Vec<Item> = self
            .items
            .iter()
            .filter(|item| &item.column_id != id)
            .cloned()
            .collect();
        let cascaded = before - items.len();

        self.replace_items(items)?;
        self.replace_columns(columns)?;

        tracing::info!(column = %id, cascaded, "column deleted");
        Ok(removed)
    }

    /// Creates an item at the end of a column
    pub fn add_item(&mut self, column_id: &ColumnId, draft: ItemDraft) -> Result<ItemId> {
        self.column_index(column_id)?;
        let item = draft.into_item(column_id.clone())?;
        let id = item.id.clone();
        let kind = item.kind;

        let mut items = self.items.clone();
        items.push(item);
        self.replace_items(items)?;

        tracing::info!(item = %id, kind = kind.label(), column = %column_id, "item added");
        Ok(id)
    }

    pub fn edit_item(&mut self, id: &ItemId, edit: &ItemEdit) -> Result<()> {
        let index = self.item_index(id)?;
        if edit.is_empty() {
            return Ok(());
        }

        let mut items = self.items.clone();
        edit.apply_to(&mut items[index])?;
        self.replace_items(items)?;

        tracing::info!(item = %id, "item edited");
        Ok(())
    }

    pub fn delete_item(&mut self, id: &ItemId) -> Result<Item> {
        let index = self.item_index(id)?;

        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.replace_items(items)?;

        tracing::info!(item = %id, kind = removed.kind.label(), "item deleted");
        Ok(removed)
    }

    /// Sets a task's completion flag
    pub fn set_item_completed(&mut self, id: &ItemId, completed: bool) -> Result<()> {
        let index = self.item_index(id)?;

        let mut items = self.items.clone();
        items[index].set_completed(completed)?;
        self.replace_items(items)?;

        tracing::debug!(item = %id, completed, "task completion changed");
        Ok(())
    }

    /// Flips a task's completion flag and returns the new value
    pub fn toggle_item_completed(&mut self, id: &ItemId) -> Result<bool> {
        let index = self.item_index(id)?;
        let completed = !self.items[index].is_completed;
        self.set_item_completed(id, completed)?;
        Ok(completed)
    }

    pub fn set_open_links_in_new_tab(&mut self, enabled: bool) -> Result<()> {
        self.replace_settings(Settings {
            open_links_in_new_tab: enabled,
        })
    }

    pub fn toggle_open_links_in_new_tab(&mut self) -> Result<bool> {
        let enabled = !self.settings.open_links_in_new_tab;
        self.set_open_links_in_new_tab(enabled)?;
        Ok(enabled)
    }

    fn column_index(&self, id: &ColumnId) -> Result<usize> {
        self.columns
            .iter()
            .position(|col| &col.id == id)
            .ok_or_else(|| TabdeckError::ColumnNotFound(id.to_string()))
    }

    fn item_index(&self, id: &ItemId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| TabdeckError::ItemNotFound(id.to_string()))
    }
}
