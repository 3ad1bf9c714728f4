use anyhow::Result;
use clap::Parser;
use kanban_vault::KanbanError;
use log::LevelFilter;
use std::process::ExitCode;

mod cli_bin;

use cli_bin::args::{Cli, Commands};
use cli_bin::commands::*;

/// Exit status for failures the caller can fix by changing the arguments
const EXIT_USAGE: u8 = 2;
/// Exit status for everything else (path violations, I/O)
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Library errors carry alternatives that only `describe` renders
            match err.downcast_ref::<KanbanError>() {
                Some(kanban) => eprintln!("Error: {}", kanban.describe()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // The guard only accepts absolute roots
    let vault = if cli.vault.is_absolute() {
        cli.vault.clone()
    } else {
        std::env::current_dir()?.join(&cli.vault)
    };
    let vault = vault.as_path();

    match cli.command {
        Commands::List => list_command(vault),
        Commands::Show(args) => show_command(vault, args),
        Commands::Create(args) => create_command(vault, args),
        Commands::Delete(args) => delete_command(vault, args),
        Commands::AddItem(args) => add_item_command(vault, args),
        Commands::RemoveItem(args) => remove_item_command(vault, args),
        Commands::MoveItem(args) => move_item_command(vault, args),
        Commands::UpdateItem(args) => update_item_command(vault, args),
        Commands::CompleteItem(args) => complete_item_command(vault, args),
        Commands::ReorderItem(args) => reorder_item_command(vault, args),
        Commands::AddColumn(args) => add_column_command(vault, args),
        Commands::RemoveColumn(args) => remove_column_command(vault, args),
        Commands::RenameColumn(args) => rename_column_command(vault, args),
        Commands::MoveColumn(args) => move_column_command(vault, args),
        Commands::Clone(args) => clone_command(vault, args),
        Commands::Merge(args) => merge_command(vault, args),
        Commands::Archive(args) => archive_command(vault, args),
    }
}

fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<KanbanError>() {
        Some(kanban) if kanban.is_recoverable() => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(LevelFilter::Debug);
    } else if cli.quiet {
        builder.filter_level(LevelFilter::Error);
    }
    builder.init();
}
