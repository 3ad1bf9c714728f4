//! Structural mutations over a [`Board`](crate::core::Board)
//!
//! Every lookup by column name or item text picks the **first exact match in
//! document order**. Duplicate item text is legal; callers that need to
//! address a later duplicate must disambiguate before calling.
//!
//! Operations validate all their inputs and lookups before touching the
//! board, so a failed call leaves the board exactly as it was.

pub mod boards;
pub mod columns;
pub mod items;

pub use boards::{archive_done, clone_board, merge, DEFAULT_ARCHIVE_COLUMN};
pub use columns::{add_column, move_column, remove_column, rename_column};
pub use items::{
    add_item, complete_item, move_item, remove_item, reorder_item, update_item,
};

use crate::core::board::{Board, Column};
use crate::error::{EntityKind, KanbanError, Result};

/// Index of the column named `name`, or a NotFound listing the board's columns
pub(crate) fn require_column(board: &Board, name: &str) -> Result<usize> {
    board
        .column_index(name)
        .ok_or_else(|| KanbanError::not_found(EntityKind::Column, name, board.column_names()))
}

/// Index of the first item with `text`, or a NotFound listing the column's items
pub(crate) fn require_item(column: &Column, text: &str) -> Result<usize> {
    column
        .position_of(text)
        .ok_or_else(|| KanbanError::not_found(EntityKind::Item, text, column.item_texts()))
}
