//! Board persistence inside a vault
//!
//! [`BoardStore`] is the only place that turns a vault root plus a
//! caller-supplied path into file I/O. Every entry point resolves the path
//! through the [`PathGuard`] first, so nothing here can touch a file outside
//! the vault.
//!
//! There is no locking: two concurrent read → mutate → write sequences on the
//! same board end with the last writer's state. Each individual write is still
//! atomic.

use crate::core::board::{Board, PluginMode, Settings};
use crate::core::codec;
use crate::core::validate::validate_column_name;
use crate::error::{ConflictKind, EntityKind, KanbanError, Result};
use crate::io::guard::PathGuard;
use crate::io::resolver::{BoardEntry, BoardResolver, ResolverConfig};
use crate::io::writer::{AtomicWriter, WriteReport, WriterConfig};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Configuration for the board store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum board file size to read (in bytes)
    pub max_file_size: Option<u64>,
    /// Settings for the atomic writer
    pub writer: WriterConfig,
    /// Settings for board discovery
    pub resolver: ResolverConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
            writer: WriterConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

/// Read/write access to board files inside a vault
#[derive(Debug, Clone)]
pub struct BoardStore {
    config: StoreConfig,
    writer: AtomicWriter,
    resolver: BoardResolver,
}

impl BoardStore {
    /// Create a new store with default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a new store with custom configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            writer: AtomicWriter::with_config(config.writer.clone()),
            resolver: BoardResolver::with_config(config.resolver.clone()),
            config,
        }
    }

    /// Get store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read and parse the board at `rel_path`
    ///
    /// The returned board's `path` is the resolved absolute path.
    pub fn read<P: AsRef<Path>>(&self, vault_root: P, rel_path: &str) -> Result<Board> {
        let guard = PathGuard::new(vault_root)?;
        let path = guard.resolve(rel_path)?;
        let metadata = self.board_metadata(&guard, &path, rel_path)?;

        if let Some(max_size) = self.config.max_file_size {
            if metadata.len() > max_size {
                return Err(KanbanError::input_format(
                    "board file",
                    format!(
                        "{} bytes exceeds the limit of {} bytes",
                        metadata.len(),
                        max_size
                    ),
                ));
            }
        }

        let content = fs::read_to_string(&path).map_err(|e| KanbanError::io(&path, e))?;
        let mut board = codec::parse(&content)?;
        board.path = path;

        debug!(
            "Read board {} ({} columns, {} items)",
            board.path.display(),
            board.columns.len(),
            board.item_count()
        );
        Ok(board)
    }

    /// Serialize `board` and atomically write it to `rel_path`
    pub fn write<P: AsRef<Path>>(
        &self,
        vault_root: P,
        rel_path: &str,
        board: &Board,
    ) -> Result<WriteReport> {
        let path = PathGuard::new(vault_root)?.resolve(rel_path)?;
        let content = codec::serialize(board)?;
        let report = self.writer.write(&path, &content)?;
        if report.modified {
            info!("Updated board: {}", path.display());
        }
        Ok(report)
    }

    /// Compute the write for `board` without touching the disk
    pub fn preview<P: AsRef<Path>>(
        &self,
        vault_root: P,
        rel_path: &str,
        board: &Board,
    ) -> Result<WriteReport> {
        let path = PathGuard::new(vault_root)?.resolve(rel_path)?;
        let content = codec::serialize(board)?;
        self.writer.preview(&path, &content)
    }

    /// Read a board, apply `mutate`, and write it back
    ///
    /// Nothing is written when `mutate` fails. With `dry_run` the write is
    /// only previewed.
    pub fn update<P, F, T>(
        &self,
        vault_root: P,
        rel_path: &str,
        dry_run: bool,
        mutate: F,
    ) -> Result<(T, WriteReport)>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut Board) -> Result<T>,
    {
        let vault_root = vault_root.as_ref();
        let mut board = self.read(vault_root, rel_path)?;
        let outcome = mutate(&mut board)?;
        let report = if dry_run {
            self.preview(vault_root, rel_path, &board)?
        } else {
            self.write(vault_root, rel_path, &board)?
        };
        Ok((outcome, report))
    }

    /// Create a new board with empty columns
    ///
    /// Fails if a file already exists at `rel_path`.
    pub fn create<P, S>(
        &self,
        vault_root: P,
        rel_path: &str,
        columns: &[S],
        mode: PluginMode,
    ) -> Result<Board>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let vault_root = vault_root.as_ref();
        let path = PathGuard::new(vault_root)?.resolve(rel_path)?;
        if fs::symlink_metadata(&path).is_ok() {
            return Err(KanbanError::conflict(ConflictKind::BoardExists { path }));
        }

        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        for column in columns {
            let name = validate_column_name(column.as_ref())?;
            if names.contains(&name) {
                return Err(KanbanError::conflict(ConflictKind::DuplicateColumn { name }));
            }
            names.push(name);
        }

        let mut board = Board::with_columns(&path, names);
        board.settings = Settings::with_mode(mode);
        self.write(vault_root, rel_path, &board)?;

        info!("Created board: {}", path.display());
        Ok(board)
    }

    /// Delete the board file at `rel_path`
    pub fn delete<P: AsRef<Path>>(&self, vault_root: P, rel_path: &str) -> Result<PathBuf> {
        let guard = PathGuard::new(vault_root)?;
        let path = guard.resolve(rel_path)?;
        self.board_metadata(&guard, &path, rel_path)?;

        fs::remove_file(&path).map_err(|e| KanbanError::io(&path, e))?;
        info!("Deleted board: {}", path.display());
        Ok(path)
    }

    /// List the boards in the vault
    pub fn list<P: AsRef<Path>>(&self, vault_root: P) -> Result<Vec<BoardEntry>> {
        let guard = PathGuard::new(vault_root)?;
        self.resolver.list(&guard)
    }

    /// Metadata of the board file at `path`
    ///
    /// A missing entry or one that is not a regular file is `NotFound`; any
    /// other stat failure is `Io`.
    fn board_metadata(&self, guard: &PathGuard, path: &Path, rel_path: &str) -> Result<fs::Metadata> {
        let missing = || {
            KanbanError::not_found(EntityKind::Board, rel_path, self.board_names(guard))
        };
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Ok(metadata),
            Ok(_) => Err(missing()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(missing()),
            Err(e) => Err(KanbanError::io(path, e)),
        }
    }

    /// Vault-relative board paths, for NotFound diagnostics
    fn board_names(&self, guard: &PathGuard) -> Vec<String> {
        self.resolver
            .list(guard)
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|e| e.relative.to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
