use crate::domain::column::{Column, ColumnId};
use crate::domain::item::{Item, ItemId};

/// Where a dragged item was released or is hovering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemTarget {
    /// Over another item; the dragged item lands just above it
    Item(ItemId),
    /// Over a column body with no item underneath
    Column(ColumnId),
}

/// Stable move of one element from `from` to `to`.
///
/// Every other element keeps its relative order. `to` is clamped to the last
/// index; an out-of-range `from` leaves the list untouched.
pub fn array_move<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from >= list.len() || from == to {
        return;
    }
    let element = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, element);
}

/// Items of one column, in display order
pub fn items_in_column<'a>(
    items: &'a [Item],
    column_id: &ColumnId,
) -> impl Iterator<Item = &'a Item> + 'a {
    let column_id = column_id.clone();
    items.iter().filter(move |item| item.column_id == column_id)
}

/// Zero-based position of an item within its column plus the column's size
pub fn position_in_column(items: &[Item], id: &ItemId) -> Option<(usize, usize)> {
    let item = items.iter().find(|item| &item.id == id)?;
    let mut position = None;
    let mut count = 0;
    for (index, sibling) in items_in_column(items, &item.column_id).enumerate() {
        if &sibling.id == id {
            position = Some(index);
        }
        count += 1;
    }
    position.map(|p| (p, count))
}

/// Computes the items collection after moving `active` onto `target`.
///
/// Returns `None` when the move is a no-op or cannot be resolved (unknown
/// active or target item, active dropped onto itself, or dropped onto the
/// column it already belongs to). The input is never modified.
///
/// # Examples
/// ```
/// use tabdeck_core::domain::column::ColumnId;
/// use tabdeck_core::domain::item::Item;
/// use tabdeck_core::domain::reorder::{move_item, ItemTarget};
///
/// let col = ColumnId::from("a");
/// let x = Item::new_note(col.clone(), "x".to_string());
/// let y = Item::new_note(col.clone(), "y".to_string());
/// let items = vec![x.clone(), y.clone()];
///
/// let moved = move_item(&items, &y.id, &ItemTarget::Item(x.id.clone())).unwrap();
/// assert_eq!(moved[0].id, y.id);
/// ```
pub fn move_item(items: &[Item], active: &ItemId, target: &ItemTarget) -> Option<Vec<Item>> {
    let active_index = items.iter().position(|item| &item.id == active)?;

    match target {
        ItemTarget::Item(over) => {
            if over == active {
                return None;
            }
            let over_index = items.iter().position(|item| &item.id == over)?;
            let over_column = items[over_index].column_id.clone();

            let mut next = items.to_vec();
            if next[active_index].column_id == over_column {
                array_move(&mut next, active_index, over_index);
            } else {
                let mut moving = next.remove(active_index);
                moving.column_id = over_column;
                let anchor = next.iter().position(|item| &item.id == over)?;
                next.insert(anchor, moving);
            }
            Some(next)
        }
        ItemTarget::Column(column_id) => {
            if &items[active_index].column_id == column_id {
                return None;
            }
            let mut next = items.to_vec();
            next[active_index].column_id = column_id.clone();
            Some(next)
        }
    }
}

/// Computes the column order after moving `active` to where `over` sits
pub fn move_column(columns: &[Column], active: &ColumnId, over: &ColumnId) -> Option<Vec<Column>> {
    if active == over {
        return None;
    }
    let from = columns.iter().position(|col| &col.id == active)?;
    let to = columns.iter().position(|col| &col.id == over)?;

    let mut next = columns.to_vec();
    array_move(&mut next, from, to);
    Some(next)
}
