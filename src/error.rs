//! Error types for the kanban-vault library
//!
//! Every failure the engine can produce belongs to one of five kinds:
//! path security violations, malformed input text, missing boards/columns/items,
//! structural conflicts, and filesystem I/O. Callers branch on [`ErrorKind`]
//! rather than on message text; [`KanbanError::describe`] is for display only.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum KanbanError {
    /// A path escapes the vault or is malformed
    #[error("Path security violation for '{path}': {reason}")]
    PathSecurity { path: String, reason: String },

    /// Item text or a column name would corrupt the document structure
    #[error("Invalid {field}: {reason}")]
    InputFormat { field: String, reason: String },

    /// A referenced board, column or item does not exist
    #[error("{kind} not found: {name}")]
    NotFound {
        kind: EntityKind,
        name: String,
        alternatives: Vec<String>,
    },

    /// The operation clashes with the current board state
    #[error("Conflict: {kind}")]
    Conflict { kind: ConflictKind },

    /// Reading, writing or renaming a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Tag identifying the class of a [`KanbanError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PathSecurity,
    InputFormat,
    NotFound,
    Conflict,
    Io,
}

/// What a [`KanbanError::NotFound`] was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Board,
    Column,
    Item,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board => write!(f, "Board"),
            Self::Column => write!(f, "Column"),
            Self::Item => write!(f, "Item"),
        }
    }
}

/// The specific clash behind a [`KanbanError::Conflict`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// A column with this name already exists
    DuplicateColumn { name: String },
    /// Source and target of a column operation are the same column
    SelfReference { name: String },
    /// The column still holds items and no target column was given
    ColumnNotEmpty { name: String, items: usize },
    /// A column position lies outside the allowed range
    PositionOutOfBounds { position: usize, max: usize },
    /// A board file already exists at the path
    BoardExists { path: PathBuf },
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn { name } => write!(f, "column '{}' already exists", name),
            Self::SelfReference { name } => {
                write!(f, "column '{}' cannot be its own target", name)
            }
            Self::ColumnNotEmpty { name, items } => write!(
                f,
                "column '{}' has {} items; a target column is required",
                name, items
            ),
            Self::PositionOutOfBounds { position, max } => {
                write!(f, "position {} is out of bounds (max {})", position, max)
            }
            Self::BoardExists { path } => write!(f, "board already exists at {}", path.display()),
        }
    }
}

impl KanbanError {
    /// Create a new path security error
    pub fn path_security(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathSecurity {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new input format error
    pub fn input_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new not found error listing the valid alternatives
    pub fn not_found(kind: EntityKind, name: impl Into<String>, alternatives: Vec<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
            alternatives,
        }
    }

    /// Create a new conflict error
    pub fn conflict(kind: ConflictKind) -> Self {
        Self::Conflict { kind }
    }

    /// Wrap an I/O failure with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathSecurity { .. } => ErrorKind::PathSecurity,
            Self::InputFormat { .. } => ErrorKind::InputFormat,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check whether the caller could succeed by changing its arguments
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PathSecurity { .. } => false,
            Self::InputFormat { .. } | Self::NotFound { .. } | Self::Conflict { .. } => true,
            Self::Io { source, .. } => !matches!(
                source.kind(),
                std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::NotFound
            ),
        }
    }

    /// Human-readable message, including alternatives for lookups that missed
    pub fn describe(&self) -> String {
        match self {
            Self::NotFound {
                alternatives, ..
            } if !alternatives.is_empty() => {
                let quoted: Vec<String> =
                    alternatives.iter().map(|a| format!("'{}'", a)).collect();
                format!("{} (available: {})", self, quoted.join(", "))
            }
            _ => self.to_string(),
        }
    }
}
