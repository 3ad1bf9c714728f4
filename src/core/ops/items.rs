//! Item-level mutations

use super::{require_column, require_item};
use crate::core::board::{Board, Item};
use crate::core::validate::validate_item_text;
use crate::error::Result;

/// Append a new item to the end of `column`
///
/// Returns the canonical text that was stored.
pub fn add_item(board: &mut Board, column: &str, text: &str, completed: bool) -> Result<String> {
    let text = validate_item_text(text)?;
    let idx = require_column(board, column)?;

    board.columns[idx].items.push(Item {
        text: text.clone(),
        completed,
        metadata: None,
    });
    Ok(text)
}

/// Remove the first item in `column` whose text equals `text`
pub fn remove_item(board: &mut Board, column: &str, text: &str) -> Result<Item> {
    let idx = require_column(board, column)?;
    let pos = require_item(&board.columns[idx], text)?;
    Ok(board.columns[idx].items.remove(pos))
}

/// Move the first item matching `text` from `source` to the end of `target`
///
/// The item is transferred unchanged. Moving within a single column sends the
/// item to the end of that column.
pub fn move_item(board: &mut Board, text: &str, source: &str, target: &str) -> Result<()> {
    let src = require_column(board, source)?;
    let dst = require_column(board, target)?;
    let pos = require_item(&board.columns[src], text)?;

    let item = board.columns[src].items.remove(pos);
    board.columns[dst].items.push(item);
    Ok(())
}

/// Replace the text of the first item matching `old_text`
///
/// Completion state and metadata are left untouched.
pub fn update_item(board: &mut Board, column: &str, old_text: &str, new_text: &str) -> Result<String> {
    let new_text = validate_item_text(new_text)?;
    let idx = require_column(board, column)?;
    let pos = require_item(&board.columns[idx], old_text)?;

    board.columns[idx].items[pos].text = new_text.clone();
    Ok(new_text)
}

/// Set or toggle the completion state of the first item matching `text`
///
/// With `completed = None` the current state is flipped. Returns the new state.
pub fn complete_item(
    board: &mut Board,
    column: &str,
    text: &str,
    completed: Option<bool>,
) -> Result<bool> {
    let idx = require_column(board, column)?;
    let pos = require_item(&board.columns[idx], text)?;

    let item = &mut board.columns[idx].items[pos];
    item.completed = completed.unwrap_or(!item.completed);
    Ok(item.completed)
}

/// Move the first item matching `text` to `position` within its column
///
/// The position is clamped to the column length measured after the item has
/// been taken out, so any oversized position lands the item at the end.
/// Returns the index the item ended up at.
pub fn reorder_item(board: &mut Board, column: &str, text: &str, position: usize) -> Result<usize> {
    let idx = require_column(board, column)?;
    let pos = require_item(&board.columns[idx], text)?;

    let items = &mut board.columns[idx].items;
    let item = items.remove(pos);
    let at = position.min(items.len());
    items.insert(at, item);
    Ok(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EntityKind, ErrorKind, KanbanError};
    use pretty_assertions::assert_eq;

    fn board() -> Board {
        let mut board = Board::with_columns("b.md", ["Todo", "Doing", "Done"]);
        board.columns[0].items = vec![Item::new("a"), Item::new("b"), Item::new("c")];
        board.columns[2].items = vec![Item::completed("shipped")];
        board
    }

    fn texts(board: &Board, column: &str) -> Vec<String> {
        board.column(column).unwrap().item_texts()
    }

    #[test]
    fn test_add_item_appends_trimmed() {
        let mut b = board();
        let stored = add_item(&mut b, "Doing", "  new task ", false).unwrap();
        assert_eq!(stored, "new task");
        assert_eq!(texts(&b, "Doing"), vec!["new task"]);

        add_item(&mut b, "Doing", "second", true).unwrap();
        assert_eq!(b.columns[1].items[1], Item::completed("second"));
    }

    #[test]
    fn test_add_item_rejects_before_lookup_or_mutation() {
        let mut b = board();
        let before = b.clone();
        let err = add_item(&mut b, "Todo", "x\n## Evil", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputFormat);
        assert_eq!(b, before);
    }

    #[test]
    fn test_add_item_missing_column() {
        let mut b = board();
        match add_item(&mut b, "Nope", "task", false).unwrap_err() {
            KanbanError::NotFound {
                kind, alternatives, ..
            } => {
                assert_eq!(kind, EntityKind::Column);
                assert_eq!(alternatives, vec!["Todo", "Doing", "Done"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_remove_item_first_match() {
        let mut b = board();
        b.columns[0].items.push(Item::completed("a"));
        let removed = remove_item(&mut b, "Todo", "a").unwrap();
        assert!(!removed.completed);
        assert_eq!(texts(&b, "Todo"), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_remove_item_missing() {
        let mut b = board();
        let err = remove_item(&mut b, "Todo", "zzz").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.describe().contains("'a', 'b', 'c'"));
    }

    #[test]
    fn test_move_item_transfers_ownership() {
        let mut b = board();
        b.columns[0].items[1].completed = true;
        move_item(&mut b, "b", "Todo", "Done").unwrap();

        assert_eq!(texts(&b, "Todo"), vec!["a", "c"]);
        assert_eq!(texts(&b, "Done"), vec!["shipped", "b"]);
        assert!(b.columns[2].items[1].completed);
        assert_eq!(b.item_count(), 4);
    }

    #[test]
    fn test_move_item_missing_target_leaves_board_untouched() {
        let mut b = board();
        let before = b.clone();
        assert!(move_item(&mut b, "a", "Todo", "Later").is_err());
        assert!(move_item(&mut b, "zzz", "Todo", "Done").is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn test_move_item_within_same_column() {
        let mut b = board();
        move_item(&mut b, "a", "Todo", "Todo").unwrap();
        assert_eq!(texts(&b, "Todo"), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_update_item_keeps_state() {
        let mut b = board();
        let mut meta = std::collections::BTreeMap::new();
        meta.insert("due".to_string(), serde_json::json!("2024-01-01"));
        b.columns[2].items[0].metadata = Some(meta.clone());

        update_item(&mut b, "Done", "shipped", "released").unwrap();
        let item = &b.columns[2].items[0];
        assert_eq!(item.text, "released");
        assert!(item.completed);
        assert_eq!(item.metadata, Some(meta));
    }

    #[test]
    fn test_update_item_validates_new_text() {
        let mut b = board();
        assert!(update_item(&mut b, "Todo", "a", "   ").is_err());
        assert_eq!(texts(&b, "Todo"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_complete_item_set_and_toggle() {
        let mut b = board();
        assert!(complete_item(&mut b, "Todo", "a", None).unwrap());
        assert!(!complete_item(&mut b, "Todo", "a", None).unwrap());
        assert!(complete_item(&mut b, "Todo", "a", Some(true)).unwrap());
        assert!(complete_item(&mut b, "Todo", "a", Some(true)).unwrap());
        assert!(!complete_item(&mut b, "Done", "shipped", Some(false)).unwrap());
    }

    #[test]
    fn test_reorder_item_to_front() {
        let mut b = board();
        assert_eq!(reorder_item(&mut b, "Todo", "c", 0).unwrap(), 0);
        assert_eq!(texts(&b, "Todo"), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_reorder_item_clamps_past_end() {
        let mut b = board();
        assert_eq!(reorder_item(&mut b, "Todo", "a", 99).unwrap(), 2);
        assert_eq!(texts(&b, "Todo"), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_item_position_measured_after_removal() {
        let mut b = board();
        reorder_item(&mut b, "Todo", "a", 1).unwrap();
        assert_eq!(texts(&b, "Todo"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_reorder_item_missing() {
        let mut b = board();
        assert_eq!(
            reorder_item(&mut b, "Doing", "a", 0).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
