//! Integration tests for the kanban-vault library
//!
//! These exercise the public API end to end: documents on disk in a temporary
//! vault, read through the store, edited with the mutation library and
//! written back.

use kanban_vault::io::guard;
use kanban_vault::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLE: &str = r#"---

kanban-plugin: basic

---

## Backlog

- [ ] Task 1
- [ ] Task 2


## Done

- [x] Done task


"#;

fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn read_file(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

#[test]
fn test_parse_sample_board() {
    let board = codec::parse(SAMPLE).unwrap();

    assert_eq!(board.settings.plugin, PluginMode::Basic);
    assert_eq!(board.column_names(), vec!["Backlog", "Done"]);
    assert_eq!(
        board.columns[0].items,
        vec![Item::new("Task 1"), Item::new("Task 2")]
    );
    assert_eq!(board.columns[1].items, vec![Item::completed("Done task")]);
}

#[test]
fn test_archive_sample_board() {
    let mut board = codec::parse(SAMPLE).unwrap();
    let archived = ops::archive_done(&mut board, ops::DEFAULT_ARCHIVE_COLUMN).unwrap();

    assert_eq!(archived, 1);
    assert_eq!(board.column_names(), vec!["Backlog", "Done", "Archive"]);
    assert_eq!(
        board.column("Backlog").unwrap().items,
        vec![Item::new("Task 1"), Item::new("Task 2")]
    );
    assert!(board.column("Done").unwrap().items.is_empty());
    assert_eq!(
        board.column("Archive").unwrap().items,
        vec![Item::completed("Done task")]
    );
}

#[test]
fn test_add_column_at_position() {
    let mut board = Board::with_columns("b.md", ["A", "B", "C"]);
    ops::add_column(&mut board, "Review", Some(1)).unwrap();
    assert_eq!(board.column_names(), vec!["A", "Review", "B", "C"]);
}

#[test]
fn test_path_escape_rejected() {
    let dir = TempDir::new().unwrap();
    for target in [r"C:\Windows\System32", "/etc/passwd", "../../etc/passwd", "a/../../b"] {
        let err = guard::resolve(dir.path(), target).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathSecurity, "target {target:?}");
    }

    // A vault root that does not exist is refused the same way
    let err = guard::resolve("/vault", "/etc/passwd").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathSecurity);
}

#[test]
fn test_merge_dedups_by_text() {
    let mut first = Board::with_columns("a.md", ["To Do"]);
    ops::add_item(&mut first, "To Do", "Write docs", false).unwrap();
    let mut second = Board::with_columns("b.md", ["To Do"]);
    ops::add_item(&mut second, "To Do", "Write docs", false).unwrap();

    let mut target = Board::new("merged.md");
    let added = ops::merge(&mut target, &[first, second]);

    assert_eq!(added, 1);
    assert_eq!(target.column_names(), vec!["To Do"]);
    assert_eq!(target.column("To Do").unwrap().items, vec![Item::new("Write docs")]);
}

#[test]
fn test_serialize_is_deterministic_and_stable() {
    let board = codec::parse(SAMPLE).unwrap();
    let once = codec::serialize(&board).unwrap();
    let twice = codec::serialize(&codec::parse(&once).unwrap()).unwrap();

    assert_eq!(once, twice);
    assert_eq!(codec::serialize(&board).unwrap(), once);
    assert_eq!(codec::parse(&once).unwrap().columns, board.columns);
}

#[test]
fn test_settings_extras_survive_write_and_read() {
    let vault = vault_with(&[(
        "board.md",
        "---\nkanban-plugin: advanced\nlane-width: 300\n---\n\n## A\n",
    )]);
    let store = BoardStore::new();

    let (_, report) = store
        .update(vault.path(), "board.md", false, |board| {
            ops::add_item(board, "A", "one", false)
        })
        .unwrap();
    assert!(report.modified);

    let board = store.read(vault.path(), "board.md").unwrap();
    assert_eq!(board.settings.plugin, PluginMode::Advanced);
    assert_eq!(board.settings.get("lane-width"), Some(serde_json::json!(300)));
    assert!(read_file(&vault, "board.md").contains("\"lane-width\":300"));
}

#[test]
fn test_store_lifecycle() {
    let vault = TempDir::new().unwrap();
    let store = BoardStore::new();

    store
        .create(vault.path(), "team/sprint.md", &["Todo", "Done"], PluginMode::Basic)
        .unwrap();
    assert_eq!(
        store
            .list(vault.path())
            .unwrap()
            .into_iter()
            .map(|e| e.relative)
            .collect::<Vec<_>>(),
        vec![Path::new("team").join("sprint.md")]
    );

    store
        .update(vault.path(), "team/sprint.md", false, |board| {
            ops::add_item(board, "Todo", "Plan", false)?;
            ops::add_item(board, "Todo", "Build", false)?;
            ops::move_item(board, "Plan", "Todo", "Done")?;
            ops::complete_item(board, "Done", "Plan", Some(true))
        })
        .unwrap();

    let board = store.read(vault.path(), "team/sprint.md").unwrap();
    assert_eq!(board.column("Todo").unwrap().item_texts(), vec!["Build"]);
    assert_eq!(board.column("Done").unwrap().items, vec![Item::completed("Plan")]);

    store.delete(vault.path(), "team/sprint.md").unwrap();
    assert!(store.list(vault.path()).unwrap().is_empty());
}

#[test]
fn test_failed_mutation_writes_nothing() {
    let vault = vault_with(&[("board.md", SAMPLE)]);
    let store = BoardStore::new();

    let cases: Vec<(ErrorKind, Box<dyn FnOnce(&mut Board) -> Result<()>>)> = vec![
        (
            ErrorKind::InputFormat,
            Box::new(|b| ops::add_item(b, "Backlog", "line\n## Injected", false).map(|_| ())),
        ),
        (
            ErrorKind::InputFormat,
            Box::new(|b| ops::add_column(b, "Bad\nName", None).map(|_| ())),
        ),
        (
            ErrorKind::NotFound,
            Box::new(|b| ops::remove_item(b, "Backlog", "Task 9").map(|_| ())),
        ),
        (
            ErrorKind::Conflict,
            Box::new(|b| ops::remove_column(b, "Backlog", None).map(|_| ())),
        ),
        (
            ErrorKind::Conflict,
            Box::new(|b| ops::rename_column(b, "Backlog", "Done").map(|_| ())),
        ),
        (
            ErrorKind::Conflict,
            Box::new(|b| ops::move_column(b, "Backlog", 2).map(|_| ())),
        ),
    ];

    for (expected, mutation) in cases {
        let err = store
            .update(vault.path(), "board.md", false, mutation)
            .unwrap_err();
        assert_eq!(err.kind(), expected, "{err}");
        assert_eq!(read_file(&vault, "board.md"), SAMPLE);
    }
}

#[test]
fn test_not_found_lists_alternatives() {
    let vault = vault_with(&[("board.md", SAMPLE)]);
    let err = BoardStore::new()
        .update(vault.path(), "board.md", false, |board| {
            ops::move_item(board, "Task 1", "Backlog", "Doing")
        })
        .unwrap_err();

    match &err {
        KanbanError::NotFound {
            kind,
            name,
            alternatives,
        } => {
            assert_eq!(*kind, EntityKind::Column);
            assert_eq!(name, "Doing");
            assert_eq!(alternatives, &vec!["Backlog".to_string(), "Done".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.describe(),
        "Column not found: Doing (available: 'Backlog', 'Done')"
    );
}

#[test]
fn test_dry_run_reports_diff_only() {
    let vault = vault_with(&[("board.md", SAMPLE)]);
    let (_, report) = BoardStore::new()
        .update(vault.path(), "board.md", true, |board| {
            ops::rename_column(board, "Backlog", "Inbox")
        })
        .unwrap();

    let diff = report.diff.unwrap();
    assert!(diff.contains("-## Backlog"));
    assert!(diff.contains("+## Inbox"));
    assert_eq!(read_file(&vault, "board.md"), SAMPLE);
}

#[test]
fn test_duplicate_item_text_targets_first_match() {
    let mut board = Board::with_columns("b.md", ["Todo"]);
    ops::add_item(&mut board, "Todo", "same", false).unwrap();
    ops::add_item(&mut board, "Todo", "same", true).unwrap();

    ops::complete_item(&mut board, "Todo", "same", None).unwrap();
    assert_eq!(
        board.columns[0].items,
        vec![Item::completed("same"), Item::completed("same")]
    );

    let removed = ops::remove_item(&mut board, "Todo", "same").unwrap();
    assert!(removed.completed);
    assert_eq!(board.columns[0].items.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_escape_is_refused_by_store() {
    use std::os::unix::fs::symlink;

    let outside = vault_with(&[("secret.md", SAMPLE)]);
    let vault = TempDir::new().unwrap();
    symlink(outside.path(), vault.path().join("link")).unwrap();
    let store = BoardStore::new();

    let err = store.read(vault.path(), "link/secret.md").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathSecurity);

    let err = store
        .create(vault.path(), "link/new.md", &["A"], PluginMode::Basic)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathSecurity);
    assert!(!outside.path().join("new.md").exists());
}
