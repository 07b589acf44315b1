//! `scalpel find` - recursive pattern search.

use anyhow::Result;
use clap::Args;
use scalpel_core::Config;
use scalpel_tools::search::{self, SearchOptions};
use scalpel_util::path::display_relative;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct FindArgs {
    /// Search pattern (regex)
    pub pattern: String,

    /// File or directory to search
    pub path: PathBuf,

    /// Filter by file extension(s), e.g. .rs .toml
    #[arg(long = "ext", num_args = 1.., value_name = "EXT")]
    pub extensions: Option<Vec<String>>,

    /// Case-sensitive search (default: case-insensitive)
    #[arg(short = 's', long)]
    pub case_sensitive: bool,

    /// Max results (default from config)
    #[arg(long = "max", value_name = "N")]
    pub max_results: Option<usize>,
}

pub fn run(config: &Config, args: FindArgs) -> Result<ExitCode> {
    let extensions = args.extensions.map(|exts| {
        exts.iter()
            .map(|ext| {
                let ext = ext.to_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect()
    });

    let opts = SearchOptions {
        extensions,
        case_sensitive: args.case_sensitive,
        max_results: args.max_results,
    };

    let results = search::search(&args.path, &args.pattern, &config.find, &opts)?;

    if results.matches.is_empty() {
        eprintln!("No matches for '{}'", args.pattern);
        return Ok(ExitCode::FAILURE);
    }

    for m in &results.matches {
        println!("{}:{} | {}", display_relative(&m.path), m.line, m.text);
    }

    let mut note = format!("\n{} match(es)", results.matches.len());
    if results.hit_limit {
        note.push_str(&format!(" (limit: {}, use --max to increase)", results.limit));
    }
    eprintln!("{note}");

    Ok(ExitCode::SUCCESS)
}
