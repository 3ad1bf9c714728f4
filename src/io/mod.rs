//! File I/O for board documents
//!
//! - [`guard`]: vault containment for caller-supplied paths
//! - [`writer`]: atomic temp-file-then-rename writes
//! - [`resolver`]: discovery of board documents in a vault
//! - [`store`]: read/write of boards through the guard and writer

pub mod guard;
pub mod resolver;
pub mod store;
pub mod writer;

pub use guard::{resolve, resolve_lexical, PathGuard, MAX_PATH_LENGTH};
pub use resolver::{BoardEntry, BoardResolver, ResolverConfig};
pub use store::{BoardStore, StoreConfig};
pub use writer::{write_atomic, AtomicWriter, LineEndings, WriteReport, WriterConfig};
