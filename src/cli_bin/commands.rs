//! CLI command handlers that bridge CLI arguments to library operations
//!
//! Each mutating command is a single read → mutate → write through
//! [`BoardStore::update`]; with `--dry-run` the diff is printed instead.

use crate::cli_bin::args::*;
use anyhow::Result;
use kanban_vault::error::ConflictKind;
use kanban_vault::{ops, Board, BoardStore, KanbanError, PathGuard, WriteReport};
use log::{debug, info, warn};
use std::path::Path;

/// Execute the list command
pub fn list_command(vault: &Path) -> Result<()> {
    debug!("Listing boards in {}", vault.display());

    let boards = BoardStore::new().list(vault)?;
    if boards.is_empty() {
        warn!("No boards found in {}", vault.display());
        return Ok(());
    }

    for entry in boards {
        println!("{}", entry.relative.display());
    }
    Ok(())
}

/// Execute the show command
pub fn show_command(vault: &Path, args: ShowArgs) -> Result<()> {
    debug!("Executing show command with args: {:?}", args);

    let board = BoardStore::new().read(vault, &args.board)?;
    match args.format {
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&board)?);
        }
        OutputFormat::Json => {
            let output = if args.pretty {
                serde_json::to_string_pretty(&board)?
            } else {
                serde_json::to_string(&board)?
            };
            println!("{}", output);
        }
    }
    Ok(())
}

/// Execute the create command
pub fn create_command(vault: &Path, args: CreateArgs) -> Result<()> {
    debug!("Executing create command with args: {:?}", args);

    let board = BoardStore::new().create(vault, &args.board, &args.columns, args.mode.into())?;
    info!(
        "Created {} with columns: {}",
        board.path.display(),
        board.column_names().join(", ")
    );
    Ok(())
}

/// Execute the delete command
pub fn delete_command(vault: &Path, args: DeleteArgs) -> Result<()> {
    let path = BoardStore::new().delete(vault, &args.board)?;
    info!("Deleted {}", path.display());
    Ok(())
}

/// Execute the add-item command
pub fn add_item_command(vault: &Path, args: AddItemArgs) -> Result<()> {
    let text = mutate(vault, &args.board, &args.write_options, |board| {
        ops::add_item(board, &args.column, &args.text, args.completed)
    })?;
    info!("Added '{}' to '{}'", text, args.column);
    Ok(())
}

/// Execute the remove-item command
pub fn remove_item_command(vault: &Path, args: RemoveItemArgs) -> Result<()> {
    let item = mutate(vault, &args.board, &args.write_options, |board| {
        ops::remove_item(board, &args.column, &args.text)
    })?;
    info!("Removed '{}' from '{}'", item.text, args.column);
    Ok(())
}

/// Execute the move-item command
pub fn move_item_command(vault: &Path, args: MoveItemArgs) -> Result<()> {
    mutate(vault, &args.board, &args.write_options, |board| {
        ops::move_item(board, &args.text, &args.from, &args.to)
    })?;
    info!("Moved '{}' from '{}' to '{}'", args.text, args.from, args.to);
    Ok(())
}

/// Execute the update-item command
pub fn update_item_command(vault: &Path, args: UpdateItemArgs) -> Result<()> {
    let text = mutate(vault, &args.board, &args.write_options, |board| {
        ops::update_item(board, &args.column, &args.old_text, &args.new_text)
    })?;
    info!("Updated '{}' to '{}'", args.old_text, text);
    Ok(())
}

/// Execute the complete-item command
pub fn complete_item_command(vault: &Path, args: CompleteItemArgs) -> Result<()> {
    let completed = mutate(vault, &args.board, &args.write_options, |board| {
        ops::complete_item(board, &args.column, &args.text, args.state)
    })?;
    let state = if completed { "completed" } else { "open" };
    info!("'{}' is now {}", args.text, state);
    Ok(())
}

/// Execute the reorder-item command
pub fn reorder_item_command(vault: &Path, args: ReorderItemArgs) -> Result<()> {
    let position = mutate(vault, &args.board, &args.write_options, |board| {
        ops::reorder_item(board, &args.column, &args.text, args.position)
    })?;
    if position != args.position {
        warn!("Position {} clamped to {}", args.position, position);
    }
    info!("'{}' is now at position {}", args.text, position);
    Ok(())
}

/// Execute the add-column command
pub fn add_column_command(vault: &Path, args: AddColumnArgs) -> Result<()> {
    let name = mutate(vault, &args.board, &args.write_options, |board| {
        ops::add_column(board, &args.name, args.position)
    })?;
    info!("Added column '{}'", name);
    Ok(())
}

/// Execute the remove-column command
pub fn remove_column_command(vault: &Path, args: RemoveColumnArgs) -> Result<()> {
    let moved = mutate(vault, &args.board, &args.write_options, |board| {
        ops::remove_column(board, &args.name, args.target.as_deref())
    })?;
    match &args.target {
        Some(target) => info!("Removed column '{}', moved {} items to '{}'", args.name, moved, target),
        None => info!("Removed column '{}'", args.name),
    }
    Ok(())
}

/// Execute the rename-column command
pub fn rename_column_command(vault: &Path, args: RenameColumnArgs) -> Result<()> {
    let name = mutate(vault, &args.board, &args.write_options, |board| {
        ops::rename_column(board, &args.old_name, &args.new_name)
    })?;
    info!("Renamed column '{}' to '{}'", args.old_name, name);
    Ok(())
}

/// Execute the move-column command
pub fn move_column_command(vault: &Path, args: MoveColumnArgs) -> Result<()> {
    let moved = mutate(vault, &args.board, &args.write_options, |board| {
        ops::move_column(board, &args.name, args.position)
    })?;
    if moved {
        info!("Moved column '{}' to position {}", args.name, args.position);
    } else {
        info!("Column '{}' already at position {}", args.name, args.position);
    }
    Ok(())
}

/// Execute the clone command
pub fn clone_command(vault: &Path, args: CloneArgs) -> Result<()> {
    let store = BoardStore::new();
    let source = store.read(vault, &args.source)?;

    let destination = PathGuard::new(vault)?.resolve(&args.destination)?;
    if destination.exists() {
        return Err(KanbanError::conflict(ConflictKind::BoardExists { path: destination }).into());
    }

    let board = ops::clone_board(&source, &destination);
    let report = if args.write_options.dry_run {
        store.preview(vault, &args.destination, &board)?
    } else {
        store.write(vault, &args.destination, &board)?
    };
    print_report(&report, args.write_options.dry_run);
    info!("Cloned {} to {}", args.source, args.destination);
    Ok(())
}

/// Execute the merge command
pub fn merge_command(vault: &Path, args: MergeArgs) -> Result<()> {
    let store = BoardStore::new();
    let sources = args
        .sources
        .iter()
        .map(|source| store.read(vault, source))
        .collect::<kanban_vault::Result<Vec<Board>>>()?;

    let added = mutate(vault, &args.target, &args.write_options, |board| {
        Ok(ops::merge(board, &sources))
    })?;
    info!("Merged {} items into {}", added, args.target);
    Ok(())
}

/// Execute the archive command
pub fn archive_command(vault: &Path, args: ArchiveArgs) -> Result<()> {
    let archived = mutate(vault, &args.board, &args.write_options, |board| {
        ops::archive_done(board, &args.column)
    })?;
    info!("Archived {} items into '{}'", archived, args.column);
    Ok(())
}

// Helper functions

fn mutate<T, F>(vault: &Path, board: &str, write_options: &WriteOptions, f: F) -> Result<T>
where
    F: FnOnce(&mut Board) -> kanban_vault::Result<T>,
{
    let (outcome, report) = BoardStore::new().update(vault, board, write_options.dry_run, f)?;
    print_report(&report, write_options.dry_run);
    Ok(outcome)
}

fn print_report(report: &WriteReport, dry_run: bool) {
    if dry_run {
        match &report.diff {
            Some(diff) => println!("{}", diff),
            None => info!("No changes for {}", report.path.display()),
        }
    } else if report.modified {
        info!("Updated: {}", report.path.display());
    } else {
        debug!("Unchanged: {}", report.path.display());
    }
}
