//! `scalpel edit` - apply one line-addressed mutation to a file.

use anyhow::Result;
use clap::{Args, ValueEnum};
use scalpel_core::Config;
use scalpel_snapshot::SnapshotStore;
use scalpel_tools::edit::{parse_content, EditEngine, EditOp, EditOptions};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct EditArgs {
    /// File to edit
    pub file: PathBuf,

    /// Edit action
    #[arg(value_enum)]
    pub action: EditAction,

    /// Line number (or start of range)
    pub line_start: i64,

    /// End of line range (for replace/delete range)
    pub line_end: Option<i64>,

    /// New content; use \n for line breaks. Required for replace/insert/append
    #[arg(short, long)]
    pub content: Option<String>,

    /// Read content from stdin instead of --content
    #[arg(long)]
    pub stdin: bool,

    /// Bypass the large-delete safety check
    #[arg(long)]
    pub force: bool,

    /// Skip the automatic backup for this edit
    #[arg(long)]
    pub no_backup: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EditAction {
    Replace,
    Insert,
    Append,
    Delete,
}

pub fn run(config: &Config, args: EditArgs) -> Result<ExitCode> {
    let store = SnapshotStore::new(config.backup.clone());
    let engine = EditEngine::new(&config.edit, &config.backup, &store);

    let content = match args.action {
        EditAction::Delete => Vec::new(),
        _ => read_content(args.content.as_deref(), args.stdin)?,
    };

    let op = match args.action {
        EditAction::Replace => EditOp::Replace {
            start: args.line_start,
            end: args.line_end,
        },
        EditAction::Insert => EditOp::Insert {
            line: args.line_start,
        },
        EditAction::Append => EditOp::Append {
            line: args.line_start,
        },
        EditAction::Delete => EditOp::Delete {
            start: args.line_start,
            end: args.line_end,
        },
    };

    let opts = EditOptions {
        skip_backup: args.no_backup,
        force: args.force,
    };

    let outcome = engine.apply(&args.file, &op, content, opts)?;

    if let Some(warning) = &outcome.backup_warning {
        eprintln!("WARNING: {warning}");
    }
    println!("OK: {}", outcome.message);
    Ok(ExitCode::SUCCESS)
}

/// Content comes either from the argument channel (with literal `\n`
/// expansion) or raw from stdin (no expansion).
fn read_content(content: Option<&str>, use_stdin: bool) -> Result<Vec<String>> {
    if use_stdin {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(parse_content(&raw, false))
    } else {
        let raw = content
            .ok_or_else(|| anyhow::anyhow!("no content provided (use --content or --stdin)"))?;
        Ok(parse_content(raw, true))
    }
}
