//! CLI module for the kanban-vault command-line interface
//!
//! Argument parsing lives in [`args`]; [`commands`] holds one handler per
//! subcommand.

pub mod args;
pub mod commands;
