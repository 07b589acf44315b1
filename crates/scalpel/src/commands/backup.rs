//! `scalpel backup` - create, list, restore, and diff snapshots.

use anyhow::Result;
use clap::Subcommand;
use scalpel_core::Config;
use scalpel_snapshot::SnapshotStore;
use scalpel_util::path::display_relative;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Create a backup snapshot
    Save {
        /// File to back up
        file: PathBuf,
        /// Named tag for this snapshot
        #[arg(long, value_name = "NAME")]
        tag: Option<String>,
    },
    /// List all backups for a file
    List {
        /// File to list backups for
        file: PathBuf,
    },
    /// Restore from backup (most recent, or a tagged one)
    Restore {
        /// File to restore
        file: PathBuf,
        /// Restore a specific tagged backup
        #[arg(long, value_name = "NAME")]
        tag: Option<String>,
    },
    /// Diff the current file against its last backup
    Diff {
        /// File to diff
        file: PathBuf,
    },
}

pub fn run(config: &Config, command: BackupCommand) -> Result<ExitCode> {
    let store = SnapshotStore::new(config.backup.clone());

    match command {
        BackupCommand::Save { file, tag } => {
            let dest = store.save(&file, tag.as_deref())?;
            println!("OK: saved backup {}", display_relative(&dest));
        }
        BackupCommand::List { file } => {
            let entries = store.list(&file)?;
            if entries.is_empty() {
                println!("No backups found for {}", file.display());
                return Ok(ExitCode::SUCCESS);
            }

            println!("Backups for {} ({}):\n", file.display(), entries.len());
            let base_len = file
                .file_name()
                .map(|n| n.to_string_lossy().len())
                .unwrap_or(0);
            for (index, entry) in entries.iter().enumerate() {
                let size = std::fs::metadata(&entry.path).map(|m| m.len()).unwrap_or(0);
                // Strip "basename." to show just the timestamp and tag.
                let suffix = &entry.name[base_len + 1..];
                println!("  {:>3}. {}  ({})", index + 1, suffix, format_size(size));
            }
        }
        BackupCommand::Restore { file, tag } => {
            let source = store.restore(&file, tag.as_deref())?;
            println!(
                "OK: restored {} from {}",
                file.display(),
                display_relative(&source)
            );
        }
        BackupCommand::Diff { file } => {
            let records = store.diff_latest(&file)?;
            if records.is_empty() {
                println!("No differences (file matches last backup)");
            } else {
                for record in records {
                    println!("{record}");
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes}B")
    } else {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    }
}
