//! kanban-vault: A library for reading and editing Markdown kanban boards inside a vault
//!
//! Boards are plain Markdown files: a YAML metadata block carrying the
//! `kanban-plugin` key, `## Column` headings, `- [ ]` / `- [x]` item lines and
//! an optional `%% kanban:settings` trailer. This crate parses them into a
//! typed [`Board`], applies structural edits, and writes them back atomically
//! without ever touching a file outside the vault directory.
//!
//! # Features
//!
//! - **Vault containment** for every caller-supplied path, symlinks included
//! - **Input sanitizers** that keep item text and column names from corrupting
//!   the document structure
//! - **Deterministic serialization**: parse → serialize → parse is stable
//! - **Atomic writes** through a `<file>.tmp` sibling and a rename
//! - **Typed errors** with an [`ErrorKind`] tag for every failure
//!
//! # Quick Start
//!
//! ## Reading and Editing a Board
//!
//! ```rust,no_run
//! use kanban_vault::{ops, BoardStore, Result};
//!
//! fn main() -> Result<()> {
//!     let store = BoardStore::new();
//!     let mut board = store.read("/home/me/vault", "projects/roadmap.md")?;
//!
//!     ops::add_item(&mut board, "Todo", "Write release notes", false)?;
//!     ops::move_item(&mut board, "Ship 1.0", "Doing", "Done")?;
//!
//!     store.write("/home/me/vault", "projects/roadmap.md", &board)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Read-Modify-Write in One Call
//!
//! ```rust,no_run
//! use kanban_vault::{ops, BoardStore, Result};
//!
//! fn main() -> Result<()> {
//!     let (archived, report) = BoardStore::new().update(
//!         "/home/me/vault",
//!         "projects/roadmap.md",
//!         false,
//!         |board| ops::archive_done(board, ops::DEFAULT_ARCHIVE_COLUMN),
//!     )?;
//!     println!("archived {} items into {}", archived, report.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Working with Documents Directly
//!
//! ```rust
//! use kanban_vault::codec;
//!
//! let text = "---\nkanban-plugin: basic\n---\n\n## Todo\n\n- [ ] Buy milk\n";
//! let board = codec::parse(text).unwrap();
//! assert_eq!(board.columns[0].items[0].text, "Buy milk");
//!
//! let out = codec::serialize(&board).unwrap();
//! assert_eq!(codec::parse(&out).unwrap().columns, board.columns);
//! ```
//!
//! # Architecture
//!
//! - [`core`]: the board model, validators, codec and mutation library
//! - [`io`]: path containment, atomic writes, board discovery and the store
//! - [`error`]: the error taxonomy shared by everything above

// Public API exports
pub use error::{ConflictKind, EntityKind, ErrorKind, KanbanError, Result};

// Core types
pub use crate::core::{codec, ops, validate};
pub use crate::core::{Board, Column, Item, PluginMode, Settings};

// IO types
pub use io::{
    AtomicWriter, BoardEntry, BoardResolver, BoardStore, LineEndings, PathGuard, ResolverConfig,
    StoreConfig, WriteReport, WriterConfig,
};

// Internal modules
pub mod core;
pub mod error;
pub mod io;

// CLI components are available only in the binary, not as part of the library API
