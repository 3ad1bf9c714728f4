//! Command-line argument definitions and parsing
//!
//! Every subcommand names its board by a path relative to the vault root; the
//! library resolves it through the path guard, so nothing here touches the
//! filesystem directly.

use clap::{Args, Parser, Subcommand, ValueEnum};
use kanban_vault::PluginMode;
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "kanban-vault",
    version,
    about = "A command-line tool for editing Markdown kanban boards inside a vault",
    long_about = "kanban-vault reads, edits and writes Markdown kanban boards. Every path is \
                  confined to the vault directory, item text and column names are validated \
                  before they reach the file, and writes are atomic."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root directory
    #[arg(long, global = true, env = "KANBAN_VAULT", default_value = ".", value_name = "DIR")]
    pub vault: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the boards in the vault
    List,
    /// Print a board as YAML or JSON
    Show(ShowArgs),
    /// Create a new board
    Create(CreateArgs),
    /// Delete a board file
    Delete(DeleteArgs),
    /// Append an item to a column
    AddItem(AddItemArgs),
    /// Remove an item from a column
    RemoveItem(RemoveItemArgs),
    /// Move an item to another column
    MoveItem(MoveItemArgs),
    /// Replace the text of an item
    UpdateItem(UpdateItemArgs),
    /// Set or toggle an item's completion mark
    CompleteItem(CompleteItemArgs),
    /// Move an item within its column
    ReorderItem(ReorderItemArgs),
    /// Add a column
    AddColumn(AddColumnArgs),
    /// Remove a column, optionally moving its items elsewhere
    RemoveColumn(RemoveColumnArgs),
    /// Rename a column
    RenameColumn(RenameColumnArgs),
    /// Move a column to a new position
    MoveColumn(MoveColumnArgs),
    /// Copy a board to a new file
    Clone(CloneArgs),
    /// Merge other boards into a board
    Merge(MergeArgs),
    /// Move every completed item into an archive column
    Archive(ArchiveArgs),
}

/// Common options for write operations
#[derive(Args, Debug, Clone)]
pub struct WriteOptions {
    /// Preview changes without modifying files (show diff)
    #[arg(long)]
    pub dry_run: bool,
}

/// Output formats for the show command
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Board modes accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    Basic,
    Advanced,
}

impl From<ModeArg> for PluginMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Basic => PluginMode::Basic,
            ModeArg::Advanced => PluginMode::Advanced,
        }
    }
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    /// Pretty print output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column names, in order
    #[arg(long = "column", value_name = "NAME", default_values = ["Todo", "Doing", "Done"])]
    pub columns: Vec<String>,

    /// Board mode
    #[arg(long, value_enum, default_value = "basic")]
    pub mode: ModeArg,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Board path relative to the vault
    pub board: String,
}

/// Arguments for the add-item command
#[derive(Args, Debug)]
pub struct AddItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column to append to
    #[arg(long)]
    pub column: String,

    /// Item text
    pub text: String,

    /// Mark the new item as completed
    #[arg(long)]
    pub completed: bool,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the remove-item command
#[derive(Args, Debug)]
pub struct RemoveItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column holding the item
    #[arg(long)]
    pub column: String,

    /// Item text
    pub text: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the move-item command
#[derive(Args, Debug)]
pub struct MoveItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Item text
    pub text: String,

    /// Column holding the item
    #[arg(long)]
    pub from: String,

    /// Column to append the item to
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the update-item command
#[derive(Args, Debug)]
pub struct UpdateItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column holding the item
    #[arg(long)]
    pub column: String,

    /// Current item text
    pub old_text: String,

    /// Replacement text
    pub new_text: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the complete-item command
#[derive(Args, Debug)]
pub struct CompleteItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column holding the item
    #[arg(long)]
    pub column: String,

    /// Item text
    pub text: String,

    /// Explicit state (true/false); toggles when omitted
    #[arg(long, value_name = "BOOL")]
    pub state: Option<bool>,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the reorder-item command
#[derive(Args, Debug)]
pub struct ReorderItemArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column holding the item
    #[arg(long)]
    pub column: String,

    /// Item text
    pub text: String,

    /// New zero-based position (clamped to the column length)
    pub position: usize,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the add-column command
#[derive(Args, Debug)]
pub struct AddColumnArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column name
    pub name: String,

    /// Zero-based insert position (appends when omitted)
    #[arg(long)]
    pub position: Option<usize>,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the remove-column command
#[derive(Args, Debug)]
pub struct RemoveColumnArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column name
    pub name: String,

    /// Column that receives the removed column's items
    #[arg(long)]
    pub target: Option<String>,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the rename-column command
#[derive(Args, Debug)]
pub struct RenameColumnArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Current column name
    pub old_name: String,

    /// New column name
    pub new_name: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the move-column command
#[derive(Args, Debug)]
pub struct MoveColumnArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column name
    pub name: String,

    /// New zero-based position
    pub position: usize,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the clone command
#[derive(Args, Debug)]
pub struct CloneArgs {
    /// Board to copy, relative to the vault
    pub source: String,

    /// New board path, relative to the vault
    pub destination: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Board that receives the items
    pub target: String,

    /// Boards to merge in, in order
    #[arg(required = true)]
    pub sources: Vec<String>,

    #[command(flatten)]
    pub write_options: WriteOptions,
}

/// Arguments for the archive command
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Board path relative to the vault
    pub board: String,

    /// Column that collects completed items
    #[arg(long, default_value = kanban_vault::ops::DEFAULT_ARCHIVE_COLUMN)]
    pub column: String,

    #[command(flatten)]
    pub write_options: WriteOptions,
}
