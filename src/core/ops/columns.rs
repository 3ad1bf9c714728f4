//! Column-level mutations

use super::require_column;
use crate::core::board::{Board, Column};
use crate::core::validate::validate_column_name;
use crate::error::{ConflictKind, KanbanError, Result};

/// Insert a new empty column at `position`, or at the end when omitted
///
/// `position == columns.len()` appends; anything larger is out of bounds.
/// Returns the canonical name that was stored.
pub fn add_column(board: &mut Board, name: &str, position: Option<usize>) -> Result<String> {
    let name = validate_column_name(name)?;
    if board.has_column(&name) {
        return Err(KanbanError::conflict(ConflictKind::DuplicateColumn { name }));
    }

    let len = board.columns.len();
    let at = position.unwrap_or(len);
    if at > len {
        return Err(KanbanError::conflict(ConflictKind::PositionOutOfBounds {
            position: at,
            max: len,
        }));
    }

    board.columns.insert(at, Column::new(name.clone()));
    Ok(name)
}

/// Remove a column, handing its items to `target` if it has any
///
/// Items keep their order and are appended to the end of `target`. A column
/// that still holds items cannot be removed without a target. Returns the
/// number of items that were handed over.
pub fn remove_column(board: &mut Board, name: &str, target: Option<&str>) -> Result<usize> {
    let idx = require_column(board, name)?;

    let dst = match target {
        Some(t) if t == name => {
            return Err(KanbanError::conflict(ConflictKind::SelfReference {
                name: name.to_string(),
            }))
        }
        Some(t) => Some(require_column(board, t)?),
        None => None,
    };

    let count = board.columns[idx].items.len();
    match dst {
        Some(dst) => {
            let items = std::mem::take(&mut board.columns[idx].items);
            board.columns[dst].items.extend(items);
        }
        None if count > 0 => {
            return Err(KanbanError::conflict(ConflictKind::ColumnNotEmpty {
                name: name.to_string(),
                items: count,
            }))
        }
        None => {}
    }

    board.columns.remove(idx);
    Ok(count)
}

/// Rename a column in place; its items are untouched
pub fn rename_column(board: &mut Board, old_name: &str, new_name: &str) -> Result<String> {
    let new_name = validate_column_name(new_name)?;
    let idx = require_column(board, old_name)?;
    if board.has_column(&new_name) {
        return Err(KanbanError::conflict(ConflictKind::DuplicateColumn { name: new_name }));
    }

    board.columns[idx].name = new_name.clone();
    Ok(new_name)
}

/// Move an existing column to `position`
///
/// The column already occupies a slot, so `position` must be an existing
/// index. Returns `false` when the column was already there.
pub fn move_column(board: &mut Board, name: &str, position: usize) -> Result<bool> {
    let idx = require_column(board, name)?;

    let len = board.columns.len();
    if position >= len {
        return Err(KanbanError::conflict(ConflictKind::PositionOutOfBounds {
            position,
            max: len - 1,
        }));
    }
    if idx == position {
        return Ok(false);
    }

    let column = board.columns.remove(idx);
    board.columns.insert(position, column);
    Ok(true)
}
