//! Whole-board operations: cloning, merging and archiving

use crate::core::board::{Board, Column, Item};
use crate::core::validate::validate_column_name;
use crate::error::Result;
use std::path::PathBuf;

/// Column that [`archive_done`] collects completed items into by default
pub const DEFAULT_ARCHIVE_COLUMN: &str = "Archive";

/// Deep copy of `source` under a new path
pub fn clone_board(source: &Board, path: impl Into<PathBuf>) -> Board {
    Board {
        path: path.into(),
        ..source.clone()
    }
}

/// Merge the columns of every source board into `target`
///
/// Columns are matched by exact name and created at the end of `target` when
/// missing. An item is appended only if no item with the same text is already
/// in that target column, which also collapses duplicates coming from the
/// sources themselves. Returns the number of items added.
pub fn merge(target: &mut Board, sources: &[Board]) -> usize {
    let mut added = 0;

    for source in sources {
        for column in &source.columns {
            let idx = find_or_create(target, &column.name);
            let dest = &mut target.columns[idx];
            for item in &column.items {
                if !dest.contains_text(&item.text) {
                    dest.items.push(item.clone());
                    added += 1;
                }
            }
        }
    }

    added
}

/// Collect every completed item into the archive column
///
/// The archive column is created at the end of the board if it does not
/// exist. Other columns are visited in board order; their completed items are
/// removed, keeping the relative order of what remains, and appended to the
/// archive in the order collected. Returns the number of items archived.
pub fn archive_done(board: &mut Board, archive_column: &str) -> Result<usize> {
    let archive_column = validate_column_name(archive_column)?;
    let archive_idx = find_or_create(board, &archive_column);

    let mut collected: Vec<Item> = Vec::new();
    for (idx, column) in board.columns.iter_mut().enumerate() {
        if idx == archive_idx {
            continue;
        }
        let (done, open): (Vec<Item>, Vec<Item>) =
            std::mem::take(&mut column.items).into_iter().partition(|item| item.completed);
        column.items = open;
        collected.extend(done);
    }

    let count = collected.len();
    board.columns[archive_idx].items.extend(collected);
    Ok(count)
}

fn find_or_create(board: &mut Board, name: &str) -> usize {
    match board.column_index(name) {
        Some(idx) => idx,
        None => {
            board.columns.push(Column::new(name));
            board.columns.len() - 1
        }
    }
}
