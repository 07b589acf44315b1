//! scalpel - surgical line-based file editing with automatic backups.
//!
//! Every destructive operation snapshots the file first, so no edit is
//! irreversible; snapshots can be listed, diffed, and restored.

mod commands;

use clap::{Parser, Subcommand};
use scalpel_core::Config;
use scalpel_util::log::{self, LogLevel};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scalpel")]
#[command(version, about = "Surgical line-based file editing with automatic backups")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit a file in place (replace, insert, append, delete)
    Edit(commands::edit::EditArgs),
    /// Create, list, restore, and diff file backups
    Backup {
        #[command(subcommand)]
        command: commands::backup::BackupCommand,
    },
    /// Compare two files, or a file against its backups
    Diff(commands::diff::DiffArgs),
    /// View file contents with line numbers
    View(commands::view::ViewArgs),
    /// Search for a pattern across files
    Find(commands::find::FindArgs),
    /// Print the resolved configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    log::init(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load(&cwd);

    let result = match cli.command {
        Commands::Edit(args) => commands::edit::run(&config, args),
        Commands::Backup { command } => commands::backup::run(&config, command),
        Commands::Diff(args) => commands::diff::run(&config, args),
        Commands::View(args) => commands::view::run(&config, args),
        Commands::Find(args) => commands::find::run(&config, args),
        Commands::Config => commands::config::run(&config),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
