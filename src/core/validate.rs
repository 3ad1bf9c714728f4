//! Input sanitizers for item text and column names
//!
//! Item lines and column headers are each a single physical line in the
//! document. Embedded newlines or control characters would fabricate extra
//! structural lines, so anything headed for the serializer passes through here
//! first.

use crate::error::{KanbanError, Result};

/// Maximum item text length, in characters, after trimming
pub const MAX_ITEM_TEXT_LEN: usize = 10_240;

/// Maximum column name length, in characters, after trimming
pub const MAX_COLUMN_NAME_LEN: usize = 200;

/// Validate item text and return its canonical (trimmed) form
///
/// Surrounding whitespace, including leading or trailing newlines, is
/// stripped before the control-character check; anything left inside the
/// text is rejected.
pub fn validate_item_text(text: &str) -> Result<String> {
    const FIELD: &str = "item text";

    if text.contains('\0') {
        return Err(KanbanError::input_format(FIELD, "contains a null byte"));
    }

    let trimmed = text.trim();
    if let Some(c) = trimmed.chars().find(|c| is_forbidden_control(*c)) {
        return Err(KanbanError::input_format(FIELD, describe_control(c)));
    }
    if trimmed.is_empty() {
        return Err(KanbanError::input_format(FIELD, "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_ITEM_TEXT_LEN {
        return Err(KanbanError::input_format(
            FIELD,
            format!("{} characters exceeds the limit of {}", len, MAX_ITEM_TEXT_LEN),
        ));
    }

    Ok(trimmed.to_string())
}

/// Validate a column name and return its canonical (trimmed) form
///
/// Unlike item text, a newline anywhere in the raw name is rejected, even
/// one that trimming would remove.
pub fn validate_column_name(name: &str) -> Result<String> {
    const FIELD: &str = "column name";

    if name.contains('\0') {
        return Err(KanbanError::input_format(FIELD, "contains a null byte"));
    }
    if name.contains(['\n', '\r']) {
        return Err(KanbanError::input_format(FIELD, "contains a line break"));
    }

    let trimmed = name.trim();
    if let Some(c) = trimmed.chars().find(|c| is_forbidden_control(*c)) {
        return Err(KanbanError::input_format(FIELD, describe_control(c)));
    }
    if trimmed.is_empty() {
        return Err(KanbanError::input_format(FIELD, "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_COLUMN_NAME_LEN {
        return Err(KanbanError::input_format(
            FIELD,
            format!(
                "{} characters exceeds the limit of {}",
                len, MAX_COLUMN_NAME_LEN
            ),
        ));
    }

    Ok(trimmed.to_string())
}

/// ASCII control characters other than tab
fn is_forbidden_control(c: char) -> bool {
    c.is_ascii_control() && c != '\t'
}

fn describe_control(c: char) -> String {
    match c {
        '\n' | '\r' => "contains a line break".to_string(),
        other => format!("contains control character U+{:04X}", other as u32),
    }
}
