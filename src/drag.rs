//! Drag session controller.
//!
//! A session runs `idle -> picked up -> (dragging over)* -> dropped | cancelled
//! -> idle`. Items are reordered live while they hover: every new target runs
//! the reorder engine and writes the result into the store. Columns are only
//! reordered on drop. Cancelling restores the collection captured at pick-up.
//!
//! Each transition returns the screen-reader announcement for that step.

use crate::{
    domain::{reorder, Column, ColumnId, Item, ItemId, ItemTarget},
    error::{Result, TabdeckError},
    storage::StorageKey,
    store::Store,
};

/// The entity picked up by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draggable {
    Column(ColumnId),
    Item(ItemId),
}

/// What the pointer (or keyboard cursor) is currently over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(ColumnId),
    Item(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    PickedUp,
    DraggingOver,
}

impl DragPhase {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PickedUp => "picked up",
            Self::DraggingOver => "dragging over",
        }
    }
}

/// Result of finishing a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOutcome {
    pub announcement: String,
    /// User-facing confirmation, present when the board changed
    pub confirmation: Option<String>,
    pub changed: bool,
}

/// What was picked up, with the collection as it stood at pick-up
#[derive(Debug)]
enum Origin {
    Column {
        id: ColumnId,
        snapshot: Vec<Column>,
    },
    Item {
        id: ItemId,
        column_id: ColumnId,
        snapshot: Vec<Item>,
    },
}

#[derive(Debug)]
struct Session {
    entity: Draggable,
    origin: Origin,
    phase: DragPhase,
    last_target: Option<DropTarget>,
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<Session>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(DragPhase::Idle)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn active(&self) -> Option<&Draggable> {
        self.session.as_ref().map(|s| &s.entity)
    }

    /// Column the dragged item started in
    pub fn origin_column(&self) -> Option<&ColumnId> {
        match &self.session.as_ref()?.origin {
            Origin::Item { column_id, .. } => Some(column_id),
            Origin::Column { .. } => None,
        }
    }

    /// Starts a session
    pub fn pick_up(&mut self, store: &Store, entity: Draggable) -> Result<String> {
        if let Some(session) = &self.session {
            return Err(TabdeckError::InvalidDragTransition {
                action: "pick up",
                state: session.phase.as_str(),
            });
        }

        let (origin, announcement) = match &entity {
            Draggable::Column(id) => {
                let columns = store.columns();
                let index = columns
                    .iter()
                    .position(|col| &col.id == id)
                    .ok_or_else(|| TabdeckError::ColumnNotFound(id.to_string()))?;
                let announcement = format!(
                    "Picked up Column {} at position: {} of {}",
                    columns[index].title,
                    index + 1,
                    columns.len()
                );
                let origin = Origin::Column {
                    id: id.clone(),
                    snapshot: columns.to_vec(),
                };
                (origin, announcement)
            }
            Draggable::Item(id) => {
                let item = store
                    .item(id)
                    .ok_or_else(|| TabdeckError::ItemNotFound(id.to_string()))?;
                let announcement = format!(
                    "Picked up {} {} at {}",
                    item.kind,
                    item.title,
                    describe_position(store, id)
                );
                let origin = Origin::Item {
                    id: id.clone(),
                    column_id: item.column_id.clone(),
                    snapshot: store.items().to_vec(),
                };
                (origin, announcement)
            }
        };

        tracing::debug!(entity = ?entity, "drag started");
        self.session = Some(Session {
            entity,
            origin,
            phase: DragPhase::PickedUp,
            last_target: None,
        });
        Ok(announcement)
    }

    /// Handles hovering over a new target.
    ///
    /// Returns `None` when the target is unchanged or cannot be resolved; the
    /// board is left as it is in that case.
    pub fn drag_over(&mut self, store: &mut Store, target: DropTarget) -> Result<Option<String>> {
        let session = self.session.as_mut().ok_or(TabdeckError::InvalidDragTransition {
            action: "drag over",
            state: DragPhase::Idle.as_str(),
        })?;
        session.phase = DragPhase::DraggingOver;

        if session.last_target.as_ref() == Some(&target) {
            return Ok(None);
        }

        let announcement = match (&session.entity, &target) {
            (Draggable::Item(active), DropTarget::Item(over)) => {
                if store.item(over).is_none() {
                    return Ok(None);
                }
                if let Some(next) =
                    reorder::move_item(store.items(), active, &ItemTarget::Item(over.clone()))
                {
                    store.replace_items(next)?;
                }
                let origin = session_origin_column(&session.origin);
                announce_item_over(store, active, over, origin)
            }
            (Draggable::Item(active), DropTarget::Column(column_id)) => {
                let Some(column) = store.column(column_id) else {
                    return Ok(None);
                };
                let title = column.title.clone();
                if let Some(next) = reorder::move_item(
                    store.items(),
                    active,
                    &ItemTarget::Column(column_id.clone()),
                ) {
                    store.replace_items(next)?;
                }
                store
                    .item(active)
                    .map(|item| format!("{} {} was moved over column {}", item.kind, item.title, title))
            }
            (Draggable::Column(active), target) => {
                let Some(over) = resolve_column(store, target) else {
                    return Ok(None);
                };
                let columns = store.columns();
                let active_title = columns.iter().find(|c| &c.id == active).map(|c| c.title.clone());
                let over_index = columns.iter().position(|c| c.id == over);
                match (active_title, over_index) {
                    (Some(active_title), Some(index)) => Some(format!(
                        "Column {} was moved over {} at position {} of {}",
                        active_title,
                        columns[index].title,
                        index + 1,
                        columns.len()
                    )),
                    _ => None,
                }
            }
        };

        session.last_target = Some(target);
        Ok(announcement)
    }

    /// Finalizes the session, persisting the board through the debounced write
    pub fn drop(&mut self, store: &mut Store) -> Result<DragOutcome> {
        let session = self.session.take().ok_or(TabdeckError::InvalidDragTransition {
            action: "drop",
            state: DragPhase::Idle.as_str(),
        })?;

        let outcome = match &session.origin {
            Origin::Column {
                id: active,
                snapshot,
            } => {
                let over = session
                    .last_target
                    .as_ref()
                    .and_then(|target| resolve_column(store, target));
                if let Some(next) = over.and_then(|over| reorder::move_column(store.columns(), active, &over)) {
                    store.replace_columns(next)?;
                }

                let changed = store.columns() != snapshot.as_slice();
                if changed {
                    store.persist(StorageKey::Columns)?;
                }
                let columns = store.columns();
                let announcement = match columns.iter().position(|c| &c.id == active) {
                    Some(index) => format!(
                        "Column {} was dropped into position {} of {}",
                        columns[index].title,
                        index + 1,
                        columns.len()
                    ),
                    None => "Column was dropped.".to_string(),
                };
                DragOutcome {
                    announcement,
                    confirmation: changed.then(|| "Column moved successfully".to_string()),
                    changed,
                }
            }
            Origin::Item {
                id: active,
                column_id,
                snapshot,
            } => {
                let changed = store.items() != snapshot.as_slice();
                if changed {
                    store.persist(StorageKey::Items)?;
                }
                let (announcement, label) = match store.item(active) {
                    Some(item) => {
                        let column_title = column_title(store, &item.column_id);
                        let position = reorder::position_in_column(store.items(), active)
                            .map(|(p, n)| (p + 1, n))
                            .unwrap_or((0, 0));
                        let announcement = if &item.column_id != column_id {
                            format!(
                                "{} was dropped into column {} in position {} of {}",
                                item.kind, column_title, position.0, position.1
                            )
                        } else {
                            format!(
                                "{} was dropped into position {} of {} in column {}",
                                item.kind, position.0, position.1, column_title
                            )
                        };
                        (announcement, item.kind.label())
                    }
                    None => ("Item was dropped.".to_string(), "item"),
                };
                DragOutcome {
                    announcement,
                    confirmation: changed.then(|| format!("{label} moved successfully")),
                    changed,
                }
            }
        };

        tracing::debug!(changed = outcome.changed, "drag dropped");
        Ok(outcome)
    }

    /// Abandons the session and restores the board captured at pick-up
    pub fn cancel(&mut self, store: &mut Store) -> Result<DragOutcome> {
        let session = self.session.take().ok_or(TabdeckError::InvalidDragTransition {
            action: "cancel",
            state: DragPhase::Idle.as_str(),
        })?;

        let (restored, what) = match session.origin {
            Origin::Column { snapshot, .. } => {
                let restored = store.columns() != snapshot.as_slice();
                if restored {
                    store.replace_columns(snapshot)?;
                }
                (restored, "Column".to_string())
            }
            Origin::Item { id, snapshot, .. } => {
                let restored = store.items() != snapshot.as_slice();
                let kind = snapshot
                    .iter()
                    .find(|item| item.id == id)
                    .map(|item| item.kind.to_string());
                if restored {
                    store.replace_items(snapshot)?;
                }
                (restored, kind.unwrap_or_else(|| "Item".to_string()))
            }
        };

        tracing::debug!(restored, "drag cancelled");
        Ok(DragOutcome {
            announcement: format!("Dragging {what} cancelled."),
            confirmation: None,
            changed: false,
        })
    }
}

fn session_origin_column(origin: &Origin) -> Option<&ColumnId> {
    match origin {
        Origin::Item { column_id, .. } => Some(column_id),
        Origin::Column { .. } => None,
    }
}

/// Column a target refers to; an item target resolves to its column
fn resolve_column(store: &Store, target: &DropTarget) -> Option<ColumnId> {
    match target {
        DropTarget::Column(id) => store.column(id).map(|col| col.id.clone()),
        DropTarget::Item(id) => store.item(id).map(|item| item.column_id.clone()),
    }
}

fn column_title(store: &Store, id: &ColumnId) -> String {
    store
        .column(id)
        .map(|col| col.title.clone())
        .unwrap_or_default()
}

fn describe_position(store: &Store, id: &ItemId) -> String {
    match (store.item(id), reorder::position_in_column(store.items(), id)) {
        (Some(item), Some((position, count))) => format!(
            "position: {} of {} in column {}",
            position + 1,
            count,
            column_title(store, &item.column_id)
        ),
        _ => "an unknown position".to_string(),
    }
}

fn announce_item_over(
    store: &Store,
    active: &ItemId,
    over: &ItemId,
    origin: Option<&ColumnId>,
) -> Option<String> {
    let item = store.item(active)?;
    let over_item = store.item(over)?;
    let (position, count) = reorder::position_in_column(store.items(), over)?;
    let column = column_title(store, &over_item.column_id);

    if Some(&over_item.column_id) != origin {
        Some(format!(
            "{} {} was moved over column {} in position {} of {}",
            item.kind,
            item.title,
            column,
            position + 1,
            count
        ))
    } else {
        Some(format!(
            "{} was moved over position {} of {} in column {}",
            item.kind,
            position + 1,
            count,
            column
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::StoreConfig,
        domain::{ItemDraft, ItemKind},
        storage::{MemoryStorage, Storage},
    };
    use std::sync::Arc;
    use std::time::Duration;

    struct Board {
        store: Store,
        storage: Arc<MemoryStorage>,
        a: ColumnId,
        b: ColumnId,
        ids: std::collections::HashMap<&'static str, ItemId>,
    }

    impl Board {
        fn id(&self, name: &str) -> ItemId {
            self.ids[name].clone()
        }

        fn titles(&self, column: &ColumnId) -> Vec<String> {
            self.store
                .items_in_column(column)
                .iter()
                .map(|item| item.title.clone())
                .collect()
        }
    }

    /// Column A holds x, y, z; column B holds v, w
    async fn board() -> Board {
        let storage = Arc::new(MemoryStorage::new());
        let dyn_storage: Arc<dyn Storage> = storage.clone();
        let mut store = Store::open(dyn_storage, &StoreConfig::default()).await.unwrap();
        let a = store.add_column("A").unwrap();
        let b = store.add_column("B").unwrap();

        let mut ids = std::collections::HashMap::new();
        for (column, name) in [(&a, "x"), (&a, "y"), (&a, "z"), (&b, "v"), (&b, "w")] {
            let draft = ItemDraft::Note {
                title: name.to_string(),
                content: None,
            };
            ids.insert(name, store.add_item(column, draft).unwrap());
        }
        store.flush().await.unwrap();

        Board {
            store,
            storage,
            a,
            b,
            ids,
        }
    }

    #[tokio::test]
    async fn test_cross_column_drag_scenario() {
        let mut board = board().await;
        let mut drag = DragController::new();

        let picked = drag
            .pick_up(&board.store, Draggable::Item(board.id("x")))
            .unwrap();
        assert_eq!(picked, "Picked up Note x at position: 1 of 3 in column A");
        assert_eq!(drag.phase(), DragPhase::PickedUp);
        assert_eq!(drag.origin_column(), Some(&board.a));

        let w = board.id("w");
        let over = drag
            .drag_over(&mut board.store, DropTarget::Item(w))
            .unwrap();
        assert_eq!(
            over.as_deref(),
            Some("Note x was moved over column B in position 3 of 3")
        );
        assert_eq!(drag.phase(), DragPhase::DraggingOver);

        // Live preview already landed in the store
        assert_eq!(board.titles(&board.a), vec!["y", "z"]);
        assert_eq!(board.titles(&board.b), vec!["v", "x", "w"]);

        let outcome = drag.drop(&mut board.store).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.confirmation.as_deref(), Some("note moved successfully"));
        assert_eq!(
            outcome.announcement,
            "Note was dropped into column B in position 2 of 3"
        );
        assert_eq!(drag.phase(), DragPhase::Idle);
        assert_eq!(board.titles(&board.b), vec!["v", "x", "w"]);
    }

    #[tokio::test]
    async fn test_same_column_drag() {
        let mut board = board().await;
        let mut drag = DragController::new();

        drag.pick_up(&board.store, Draggable::Item(board.id("y")))
            .unwrap();
        let x = board.id("x");
        let over = drag
            .drag_over(&mut board.store, DropTarget::Item(x))
            .unwrap();
        assert_eq!(
            over.as_deref(),
            Some("Note was moved over position 2 of 3 in column A")
        );
        assert_eq!(board.titles(&board.a), vec!["y", "x", "z"]);

        let outcome = drag.drop(&mut board.store).unwrap();
        assert_eq!(
            outcome.announcement,
            "Note was dropped into position 1 of 3 in column A"
        );
    }

    #[tokio::test]
    async fn test_drag_onto_empty_column() {
        let mut board = board().await;
        let empty = board.store.add_column("Empty").unwrap();
        let mut drag = DragController::new();

        drag.pick_up(&board.store, Draggable::Item(board.id("z")))
            .unwrap();
        let over = drag
            .drag_over(&mut board.store, DropTarget::Column(empty.clone()))
            .unwrap();
        assert_eq!(over.as_deref(), Some("Note z was moved over column Empty"));
        drag.drop(&mut board.store).unwrap();

        assert_eq!(board.titles(&empty), vec!["z"]);
        assert_eq!(board.titles(&board.a), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_cancel_restores_snapshot() {
        let mut board = board().await;
        let mut drag = DragController::new();

        drag.pick_up(&board.store, Draggable::Item(board.id("x")))
            .unwrap();
        let (v, w) = (board.id("v"), board.id("w"));
        drag.drag_over(&mut board.store, DropTarget::Item(v))
            .unwrap();
        drag.drag_over(&mut board.store, DropTarget::Item(w))
            .unwrap();
        assert_eq!(board.titles(&board.a), vec!["y", "z"]);

        let outcome = drag.cancel(&mut board.store).unwrap();
        assert_eq!(outcome.announcement, "Dragging Note cancelled.");
        assert!(outcome.confirmation.is_none());

        assert_eq!(board.titles(&board.a), vec!["x", "y", "z"]);
        assert_eq!(board.titles(&board.b), vec!["v", "w"]);
        assert!(board
            .store
            .items()
            .iter()
            .all(|item| item.kind == ItemKind::Note));
    }

    #[tokio::test]
    async fn test_unresolvable_target_is_ignored() {
        let mut board = board().await;
        let mut drag = DragController::new();
        let before = board.store.items().to_vec();

        drag.pick_up(&board.store, Draggable::Item(board.id("x")))
            .unwrap();
        let over = drag
            .drag_over(&mut board.store, DropTarget::Item(ItemId::from("ghost")))
            .unwrap();
        assert!(over.is_none());
        let over = drag
            .drag_over(&mut board.store, DropTarget::Column(ColumnId::from("ghost")))
            .unwrap();
        assert!(over.is_none());
        assert_eq!(board.store.items(), before.as_slice());

        let outcome = drag.drop(&mut board.store).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.confirmation.is_none());
    }

    #[tokio::test]
    async fn test_column_reorders_on_drop() {
        let mut board = board().await;
        let c = board.store.add_column("C").unwrap();
        let mut drag = DragController::new();

        let picked = drag
            .pick_up(&board.store, Draggable::Column(c.clone()))
            .unwrap();
        assert_eq!(picked, "Picked up Column C at position: 3 of 3");

        let over = drag
            .drag_over(&mut board.store, DropTarget::Column(board.a.clone()))
            .unwrap();
        assert_eq!(
            over.as_deref(),
            Some("Column C was moved over A at position 1 of 3")
        );
        // Columns do not move until drop
        assert_eq!(board.store.columns()[0].id, board.a);

        let outcome = drag.drop(&mut board.store).unwrap();
        assert_eq!(outcome.announcement, "Column C was dropped into position 1 of 3");
        assert_eq!(outcome.confirmation.as_deref(), Some("Column moved successfully"));

        let order: Vec<_> = board.store.columns().iter().map(|c| c.title.clone()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
        assert_eq!(board.titles(&board.b), vec!["v", "w"]);
    }

    #[tokio::test]
    async fn test_invalid_transitions() {
        let mut board = board().await;
        let mut drag = DragController::new();

        assert!(matches!(
            drag.drop(&mut board.store),
            Err(TabdeckError::InvalidDragTransition { action: "drop", .. })
        ));
        assert!(drag.cancel(&mut board.store).is_err());
        assert!(drag
            .drag_over(&mut board.store, DropTarget::Column(board.a.clone()))
            .is_err());

        drag.pick_up(&board.store, Draggable::Column(board.a.clone()))
            .unwrap();
        let err = drag
            .pick_up(&board.store, Draggable::Column(board.b.clone()))
            .unwrap_err();
        assert!(matches!(err, TabdeckError::InvalidDragTransition { .. }));

        let err = DragController::new()
            .pick_up(&board.store, Draggable::Item(ItemId::from("ghost")))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_drag_writes_once() {
        let mut board = board().await;
        let mut drag = DragController::new();
        let writes_before = board.storage.write_count(StorageKey::Items);

        drag.pick_up(&board.store, Draggable::Item(board.id("x")))
            .unwrap();
        for target in ["y", "z", "v", "w"] {
            let target = board.id(target);
            drag.drag_over(&mut board.store, DropTarget::Item(target))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        drag.drop(&mut board.store).unwrap();

        tokio::time::sleep(Duration::from_millis(2100)).await;
        tokio::task::yield_now().await;

        assert_eq!(board.storage.write_count(StorageKey::Items), writes_before + 1);
        let persisted: Vec<Item> =
            serde_json::from_str(&board.storage.get(StorageKey::Items).unwrap()).unwrap();
        assert_eq!(persisted, board.store.items());
    }
}
