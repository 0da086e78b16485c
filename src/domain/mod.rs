pub mod column;
pub mod item;
pub mod reorder;
pub mod settings;
pub mod validation;

pub use column::{Column, ColumnId};
pub use item::{Item, ItemId, ItemKind};
pub use reorder::{move_column, move_item, ItemTarget};
pub use settings::Settings;
pub use validation::{ItemDraft, ItemEdit};
