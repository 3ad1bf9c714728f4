//! Discovery of board documents inside a vault
//!
//! Walks the vault directory and keeps Markdown files whose metadata block
//! carries the `kanban-plugin` key. Only the leading metadata block of each
//! file is read. Symlinks are never followed, so the walk
//! cannot leave the vault.

use crate::core::codec::is_board_document;
use crate::error::{KanbanError, Result};
use crate::io::guard::PathGuard;
use log::{debug, warn};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Most bytes read from a file while looking for its metadata block
pub const METADATA_SCAN_LIMIT: u64 = 64 * 1024;

const METADATA_DELIMITER: &str = "---";

/// Configuration for board discovery
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum recursion depth below the vault root
    pub max_depth: Option<usize>,
    /// Descend into hidden directories and include hidden files
    pub include_hidden: bool,
    /// File extensions treated as Markdown
    pub include_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            include_hidden: false,
            include_extensions: vec!["md".to_string(), "markdown".to_string()],
        }
    }
}

/// A board document found in the vault
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    /// Path relative to the vault root
    pub relative: PathBuf,
    /// Absolute path on disk
    pub absolute: PathBuf,
}

/// Board finder bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct BoardResolver {
    config: ResolverConfig,
}

impl BoardResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// List every board document under the guard's vault, sorted by path
    pub fn list(&self, guard: &PathGuard) -> Result<Vec<BoardEntry>> {
        let root = guard.canonical_root();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || self.config.include_hidden || !is_hidden(entry));

        let mut boards = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                KanbanError::io(path, e.into())
            })?;

            if !entry.file_type().is_file() || !self.is_markdown(entry.path()) {
                continue;
            }

            let head = match read_metadata_head(entry.path()) {
                Ok(Some(head)) => head,
                Ok(None) => {
                    debug!("No metadata block: {}", entry.path().display());
                    continue;
                }
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            if !is_board_document(&head) {
                debug!("Not a board: {}", entry.path().display());
                continue;
            }

            let absolute = entry.path().to_path_buf();
            let relative = guard
                .relative(&absolute)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| absolute.clone());
            boards.push(BoardEntry { relative, absolute });
        }

        boards.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(boards)
    }

    /// Check if a file has one of the configured Markdown extensions
    fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.config.include_extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

/// Read the leading `---` … `---` block of a file, delimiters included
///
/// At most [`METADATA_SCAN_LIMIT`] bytes are read. Returns `None` when the
/// file does not open with a delimiter or the block is not closed within the
/// limit.
fn read_metadata_head(path: &Path) -> std::io::Result<Option<String>> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file.take(METADATA_SCAN_LIMIT));
    let mut head = String::new();
    let mut line = String::new();
    let mut opened = false;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        head.push_str(&line);

        let is_delimiter = line.trim_start_matches('\u{feff}').trim_end() == METADATA_DELIMITER;
        match (opened, is_delimiter) {
            (false, false) => return Ok(None),
            (false, true) => opened = true,
            (true, true) => return Ok(Some(head)),
            (true, false) => {}
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
