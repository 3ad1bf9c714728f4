//! Core board types and in-memory logic
//!
//! - [`board`]: the Board / Column / Item / Settings data model
//! - [`validate`]: sanitizers for item text and column names
//! - [`codec`]: parsing and serializing board documents
//! - [`ops`]: structural mutations

pub mod board;
pub mod codec;
pub mod ops;
pub mod validate;

pub use board::{Board, Column, Item, PluginMode, Settings, PLUGIN_KEY};
pub use codec::{is_board_document, parse, serialize};
pub use validate::{
    validate_column_name, validate_item_text, MAX_COLUMN_NAME_LEN, MAX_ITEM_TEXT_LEN,
};
