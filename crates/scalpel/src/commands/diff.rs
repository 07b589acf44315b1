//! `scalpel diff` - compare two files, or a file against its backups.

use anyhow::Result;
use clap::Args;
use scalpel_core::{diff, Config, TextDocument};
use scalpel_snapshot::SnapshotStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Args)]
pub struct DiffArgs {
    /// First file (or the target file with --backup)
    pub file1: PathBuf,

    /// Second file
    pub file2: Option<PathBuf>,

    /// Compare file1 against its most recent backup
    #[arg(long)]
    pub backup: bool,

    /// Compare against a specific tagged backup
    #[arg(long, value_name = "NAME")]
    pub tag: Option<String>,
}

pub fn run(config: &Config, args: DiffArgs) -> Result<ExitCode> {
    if args.backup || args.tag.is_some() {
        let store = SnapshotStore::new(config.backup.clone());
        let backup_path = store.resolve(&args.file1, args.tag.as_deref())?;

        let label_a = format!(
            "backup: {}",
            backup_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let label_b = format!("current: {}", args.file1.display());
        print_diff(&backup_path, &args.file1, &label_a, &label_b)
    } else if let Some(file2) = &args.file2 {
        let label_a = args.file1.display().to_string();
        let label_b = file2.display().to_string();
        print_diff(&args.file1, file2, &label_a, &label_b)
    } else {
        anyhow::bail!("provide two files or use --backup");
    }
}

fn print_diff(path_a: &Path, path_b: &Path, label_a: &str, label_b: &str) -> Result<ExitCode> {
    let doc_a = TextDocument::read(path_a)?;
    let doc_b = TextDocument::read(path_b)?;

    let records = diff::unified_diff(label_a, &doc_a.lines, label_b, &doc_b.lines);
    if records.is_empty() {
        println!("No differences found.");
    } else {
        for record in records {
            println!("{record}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
