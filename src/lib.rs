//! # Tabdeck Core
//!
//! Core state and behaviour for the Tabdeck new-tab board: columns of
//! bookmarks, notes and tasks that can be edited and rearranged by drag and
//! drop, mirrored to a key-value store with debounced writes.
//!
//! This crate has no dependency on any UI. A front end opens a [`Store`],
//! calls its mutators from event handlers and drives drag gestures through a
//! [`DragController`].

pub mod config;
pub mod domain;
pub mod drag;
pub mod error;
pub mod logging;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::{DebounceConfig, StoreConfig};
pub use domain::{
    column::{Column, ColumnId},
    item::{Item, ItemId, ItemKind},
    settings::Settings,
    validation::{ItemDraft, ItemEdit},
};
pub use drag::{DragController, DragOutcome, DragPhase, Draggable, DropTarget};
pub use error::{Result, TabdeckError};
pub use storage::{Storage, StorageKey};
pub use store::{Snapshot, Store};
