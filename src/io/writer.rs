//! Atomic file writing with change detection and diff previews
//!
//! Content is written to a sibling `<target>.tmp` file and renamed over the
//! target, so readers only ever see the old file or the complete new one. The
//! temp file is created exclusively; a stale entry left at that name is
//! unlinked rather than opened, so a planted symlink cannot redirect the
//! write. If anything fails, the temp file is removed and the original error
//! is returned with the target path attached.

use crate::error::{KanbanError, Result};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the target path for the staging file
pub const TEMP_SUFFIX: &str = ".tmp";

/// Configuration for the atomic writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// fsync the staging file before renaming it into place
    pub sync_on_write: bool,
    /// Line ending style
    pub line_endings: LineEndings,
    /// Leave the file alone when the new content is byte-identical
    pub skip_unchanged: bool,
}

/// Line ending styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEndings {
    /// Unix-style line endings (\n)
    Unix,
    /// Windows-style line endings (\r\n)
    Windows,
    /// Match the file being replaced (Unix for new files)
    Preserve,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            sync_on_write: true,
            line_endings: LineEndings::Preserve,
            skip_unchanged: true,
        }
    }
}

/// Result of a write or preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// The file that was (or would be) written
    pub path: PathBuf,
    /// Whether the content on disk changed (or would change)
    pub modified: bool,
    /// Unified diff between old and new content, when there was an old file
    pub diff: Option<String>,
}

/// Temp-file-then-rename writer
#[derive(Debug, Clone, Default)]
pub struct AtomicWriter {
    config: WriterConfig,
}

impl AtomicWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Atomically replace `path` with `content`
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteReport> {
        let original = read_existing(path)?;
        let content = self.apply_line_endings(content, original.as_deref());
        let modified = original.as_deref() != Some(content.as_str());
        let diff = original
            .as_deref()
            .and_then(|old| generate_diff(old, &content, path));

        if !modified && self.config.skip_unchanged {
            debug!("Unchanged, skipping write: {}", path.display());
            return Ok(WriteReport {
                path: path.to_path_buf(),
                modified: false,
                diff: None,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| KanbanError::io(path, e))?;
        }
        self.commit(path, &content)?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());

        Ok(WriteReport {
            path: path.to_path_buf(),
            modified,
            diff,
        })
    }

    /// Compute what [`write`](Self::write) would do without touching the disk
    pub fn preview(&self, path: &Path, content: &str) -> Result<WriteReport> {
        let original = read_existing(path)?;
        let content = self.apply_line_endings(content, original.as_deref());
        let diff = generate_diff(original.as_deref().unwrap_or(""), &content, path);

        Ok(WriteReport {
            path: path.to_path_buf(),
            modified: original.as_deref() != Some(content.as_str()),
            diff,
        })
    }

    fn commit(&self, path: &Path, content: &str) -> Result<()> {
        let tmp = temp_path_for(path);
        let mut file = open_staging(&tmp).map_err(|e| KanbanError::io(path, e))?;

        let written = write_staged(&mut file, content, self.config.sync_on_write);
        drop(file);
        let staged = written.and_then(|()| fs::rename(&tmp, path));

        if let Err(e) = staged {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!("Could not remove temp file {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(KanbanError::io(path, e));
        }

        Ok(())
    }

    /// Normalize line endings based on configuration
    fn apply_line_endings(&self, content: &str, original: Option<&str>) -> String {
        let unix = content.replace("\r\n", "\n");
        let windows = match self.config.line_endings {
            LineEndings::Unix => false,
            LineEndings::Windows => true,
            LineEndings::Preserve => original.map(|o| o.contains("\r\n")).unwrap_or(false),
        };
        if windows {
            unix.replace('\n', "\r\n")
        } else {
            unix
        }
    }
}

/// Atomically replace `path` with `content` using default settings
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    AtomicWriter::new().write(path, content).map(|_| ())
}

/// Create the staging file, refusing to open through an existing entry
///
/// A leftover regular file or symlink at `tmp` is unlinked (never followed)
/// and creation is retried once. Anything else there is an error.
fn open_staging(tmp: &Path) -> io::Result<fs::File> {
    let create = || fs::OpenOptions::new().write(true).create_new(true).open(tmp);

    match create() {
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let file_type = fs::symlink_metadata(tmp)?.file_type();
            if !(file_type.is_file() || file_type.is_symlink()) {
                return Err(e);
            }
            warn!("Removing stale temp file {}", tmp.display());
            fs::remove_file(tmp)?;
            create()
        }
        other => other,
    }
}

fn write_staged(file: &mut fs::File, content: &str, sync: bool) -> io::Result<()> {
    file.write_all(content.as_bytes())?;
    file.flush()?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// `<path>.tmp`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Current content of `path`, if it is a file holding UTF-8 text
///
/// Undecodable content counts as no original: it only feeds the diff and
/// line-ending detection, never the replace itself.
fn read_existing(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|e| KanbanError::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            debug!("Existing content is not UTF-8, replacing without diff: {}", path.display());
            Ok(None)
        }
    }
}

/// Generate unified diff between old and new content
fn generate_diff(old_content: &str, new_content: &str, path: &Path) -> Option<String> {
    if old_content == new_content {
        return None;
    }

    let old_lines: Vec<&str> = old_content.lines().collect();
    let new_lines: Vec<&str> = new_content.lines().collect();

    let mut diff_lines = vec![
        format!("--- {}", path.display()),
        format!("+++ {}", path.display()),
    ];

    // Trim the common prefix and suffix so the hunk covers only the change
    let common_prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let old_rest = &old_lines[common_prefix..];
    let new_rest = &new_lines[common_prefix..];

    let common_suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_middle = &old_rest[..old_rest.len() - common_suffix];
    let new_middle = &new_rest[..new_rest.len() - common_suffix];

    if old_middle.is_empty() && new_middle.is_empty() {
        return None;
    }

    diff_lines.push(format!(
        "@@ -{},{} +{},{} @@",
        common_prefix + 1,
        old_middle.len(),
        common_prefix + 1,
        new_middle.len()
    ));
    diff_lines.extend(old_middle.iter().map(|line| format!("-{}", line)));
    diff_lines.extend(new_middle.iter().map(|line| format!("+{}", line)));

    Some(diff_lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("board.md");

        let report = AtomicWriter::new().write(&file_path, "## A\n").unwrap();

        assert!(report.modified);
        assert_eq!(report.path, file_path);
        assert!(report.diff.is_none());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "## A\n");
        assert!(!temp_path_for(&file_path).exists());
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("board.md");
        fs::write(&file_path, "## A\n- [ ] old\n").unwrap();

        let report = AtomicWriter::new()
            .write(&file_path, "## A\n- [ ] new\n")
            .unwrap();

        assert!(report.modified);
        let diff = report.diff.unwrap();
        assert!(diff.contains("-- [ ] old"));
        assert!(diff.contains("+- [ ] new"));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "## A\n- [ ] new\n");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deeper/board.md");
        write_atomic(&file_path, "x\n").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "x\n");
    }

    #[test]
    fn test_no_change_detection() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("board.md");
        let writer = AtomicWriter::new();

        writer.write(&file_path, "same\n").unwrap();
        let report = writer.write(&file_path, "same\n").unwrap();
        assert!(!report.modified);
    }

    #[test]
    fn test_failed_rename_cleans_up_and_keeps_target() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "kept").unwrap();

        let err = AtomicWriter::new().write(&target, "content").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        match err {
            KanbanError::Io { path, .. } => assert_eq!(path, target),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!temp_path_for(&target).exists());
        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "kept");
    }

    #[cfg(unix)]
    #[test]
    fn test_planted_temp_symlink_is_not_followed() {
        use std::os::unix::fs::symlink;

        let vault = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, "ORIGINAL SECRET").unwrap();

        let target = vault.path().join("board.md");
        fs::write(&target, "## A\n").unwrap();
        symlink(&secret, temp_path_for(&target)).unwrap();

        AtomicWriter::new().write(&target, "## A\n- [ ] x\n").unwrap();

        assert_eq!(fs::read_to_string(&secret).unwrap(), "ORIGINAL SECRET");
        assert!(!fs::symlink_metadata(&target).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "## A\n- [ ] x\n");
        assert!(fs::symlink_metadata(temp_path_for(&target)).is_err());
    }

    #[test]
    fn test_stale_temp_file_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("board.md");
        fs::write(temp_path_for(&target), "leftover from a crash").unwrap();

        write_atomic(&target, "## A\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "## A\n");
        assert!(!temp_path_for(&target).exists());
    }

    #[test]
    fn test_temp_path_occupied_by_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("board.md");
        fs::write(&target, "## A\n").unwrap();
        fs::create_dir(temp_path_for(&target)).unwrap();

        let err = AtomicWriter::new().write(&target, "## B\n").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(fs::read_to_string(&target).unwrap(), "## A\n");
        assert!(temp_path_for(&target).is_dir());
    }

    #[test]
    fn test_non_utf8_original_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("board.md");
        fs::write(&target, [0xff, 0xfe, b'#', 0x80]).unwrap();

        let report = AtomicWriter::new().write(&target, "## A\n").unwrap();

        assert!(report.modified);
        assert!(report.diff.is_none());
        assert_eq!(fs::read_to_string(&target).unwrap(), "## A\n");
    }

    #[test]
    fn test_preview_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("board.md");
        fs::write(&file_path, "## Original\n").unwrap();

        let report = AtomicWriter::new()
            .preview(&file_path, "## Changed\n")
            .unwrap();

        assert!(report.modified);
        assert!(report.diff.unwrap().contains("+## Changed"));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "## Original\n");
    }

    #[test]
    fn test_preview_new_file_shows_full_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("fresh.md");

        let report = AtomicWriter::new().preview(&file_path, "## A\n").unwrap();
        assert!(report.modified);
        assert!(report.diff.unwrap().contains("+## A"));
        assert!(!file_path.exists());
    }

    #[test]
    fn test_line_endings_preserved_from_original() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("board.md");
        fs::write(&file_path, "## A\r\n").unwrap();

        AtomicWriter::new().write(&file_path, "## B\n- [ ] x\n").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "## B\r\n- [ ] x\r\n");
    }

    #[test]
    fn test_line_ending_normalization() {
        let writer = AtomicWriter::with_config(WriterConfig {
            line_endings: LineEndings::Unix,
            ..Default::default()
        });
        assert_eq!(
            writer.apply_line_endings("line1\r\nline2\n", Some("x\r\n")),
            "line1\nline2\n"
        );

        let writer = AtomicWriter::with_config(WriterConfig {
            line_endings: LineEndings::Windows,
            ..Default::default()
        });
        assert_eq!(writer.apply_line_endings("a\nb\n", None), "a\r\nb\r\n");
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/vault/board.md")),
            PathBuf::from("/vault/board.md.tmp")
        );
    }

    #[test]
    fn test_diff_generation() {
        let diff = generate_diff("line1\nline2\nline3", "line1\nmodified\nline3", Path::new("t.md"))
            .unwrap();
        assert!(diff.contains("@@ -2,1 +2,1 @@"));
        assert!(diff.contains("-line2"));
        assert!(diff.contains("+modified"));
        assert!(generate_diff("same", "same", Path::new("t.md")).is_none());
    }
}
