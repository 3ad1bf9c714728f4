//! Text ↔ board mapping
//!
//! A board document looks like this:
//!
//! ````text
//! ---
//!
//! kanban-plugin: basic
//!
//! ---
//!
//! ## Backlog
//!
//! - [ ] Task 1
//! - [x] Task 2
//!
//!
//! %% kanban:settings
//! ```
//! {"kanban-plugin":"basic"}
//! ```
//! %%
//! ````
//!
//! Parsing is permissive: lines that are neither column headers nor item
//! lines are ignored, and everything from the `%%` settings trailer onward is
//! skipped. Serializing is deterministic: the same board always produces the
//! same bytes.

use crate::core::board::{Board, Column, Item, PluginMode, Settings, PLUGIN_KEY};
use crate::error::{KanbanError, Result};
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const METADATA_DELIMITER: &str = "---";
const SETTINGS_SENTINEL: &str = "%%";
const SETTINGS_HEADER: &str = "%% kanban:settings";

fn column_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^##\s+(.+)$").expect("column header pattern compiles"))
}

fn item_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^-\s+\[([ x])\]\s+(.*)$").expect("item line pattern compiles")
    })
}

/// Parse document text into a board with an empty path
pub fn parse(text: &str) -> Result<Board> {
    let lines: Vec<&str> = text.lines().collect();
    let (metadata, body_start) = split_metadata(&lines);

    let settings = match metadata {
        Some(block) => parse_settings(&block)?,
        None => Settings::default(),
    };

    let mut columns = Vec::new();
    let mut current: Option<Column> = None;

    for line in &lines[body_start..] {
        if line.trim_start().starts_with(SETTINGS_SENTINEL) {
            break;
        }

        if let Some(caps) = column_header_re().captures(line) {
            if let Some(done) = current.take() {
                columns.push(done);
            }
            current = Some(Column::new(caps[1].trim()));
        } else if let Some(caps) = item_line_re().captures(line) {
            match current.as_mut() {
                Some(column) => column.items.push(Item {
                    text: caps[2].trim().to_string(),
                    completed: &caps[1] == "x",
                    metadata: None,
                }),
                None => debug!("Ignoring item line outside any column: {}", line),
            }
        }
    }

    if let Some(done) = current.take() {
        columns.push(done);
    }

    Ok(Board {
        path: Default::default(),
        settings,
        columns,
    })
}

/// Serialize a board into document text
pub fn serialize(board: &Board) -> Result<String> {
    let mut out = String::new();

    out.push_str(METADATA_DELIMITER);
    out.push_str("\n\n");
    out.push_str(&format!("{}: {}\n", PLUGIN_KEY, board.settings.plugin));
    if !board.settings.extra.is_empty() {
        let extra = serde_yaml::to_string(&board.settings.extra)
            .map_err(|e| KanbanError::input_format("settings", e.to_string()))?;
        out.push_str(&extra);
        if !extra.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(METADATA_DELIMITER);
    out.push_str("\n\n");

    for column in &board.columns {
        out.push_str(&format!("## {}\n\n", column.name));
        for item in &column.items {
            let mark = if item.completed { 'x' } else { ' ' };
            out.push_str(&format!("- [{}] {}\n", mark, item.text));
        }
        out.push_str("\n\n");
    }

    let snapshot = serde_json::to_string(&board.settings)
        .map_err(|e| KanbanError::input_format("settings", e.to_string()))?;
    out.push_str(SETTINGS_HEADER);
    out.push_str("\n```\n");
    out.push_str(&snapshot);
    out.push_str("\n```\n");
    out.push_str(SETTINGS_SENTINEL);
    out.push('\n');

    Ok(out)
}

/// Check whether text starts with a metadata block carrying `kanban-plugin`
pub fn is_board_document(text: &str) -> bool {
    let lines: Vec<&str> = text.lines().collect();
    match split_metadata(&lines) {
        (Some(block), _) => matches!(
            serde_yaml::from_str::<serde_yaml::Value>(&block),
            Ok(serde_yaml::Value::Mapping(map)) if map.contains_key(PLUGIN_KEY)
        ),
        (None, _) => false,
    }
}

/// Split off the leading metadata block
///
/// Returns the block's inner text and the index of the first body line. A
/// document without a complete `---` … `---` block has no metadata.
fn split_metadata(lines: &[&str]) -> (Option<String>, usize) {
    let opens = lines
        .first()
        .map(|line| line.trim_start_matches('\u{feff}').trim_end() == METADATA_DELIMITER)
        .unwrap_or(false);
    if !opens {
        return (None, 0);
    }

    match lines[1..]
        .iter()
        .position(|line| line.trim_end() == METADATA_DELIMITER)
    {
        Some(offset) => {
            let close = offset + 1;
            (Some(lines[1..close].join("\n")), close + 1)
        }
        None => (None, 0),
    }
}

fn parse_settings(block: &str) -> Result<Settings> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(block)
        .map_err(|e| KanbanError::input_format("metadata block", e.to_string()))?;

    let mapping = match yaml {
        serde_yaml::Value::Mapping(map) => map,
        serde_yaml::Value::Null => return Ok(Settings::default()),
        other => {
            return Err(KanbanError::input_format(
                "metadata block",
                format!("expected key: value lines, found {:?}", other),
            ))
        }
    };

    let mut settings = Settings::default();
    let mut extra = BTreeMap::new();

    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            other => {
                return Err(KanbanError::input_format(
                    "metadata block",
                    format!("non-string key {:?}", other),
                ))
            }
        };

        if key == PLUGIN_KEY {
            settings.plugin = match value.as_str().map(str::parse::<PluginMode>) {
                Some(Ok(mode)) => mode,
                _ => {
                    warn!("Unrecognized {} value {:?}, using basic", PLUGIN_KEY, value);
                    PluginMode::Basic
                }
            };
            continue;
        }

        let json = serde_json::to_value(&value).map_err(|e| {
            KanbanError::input_format("metadata block", format!("key '{}': {}", key, e))
        })?;
        extra.insert(key, json);
    }

    settings.extra = extra;
    Ok(settings)
}
