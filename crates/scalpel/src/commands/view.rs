//! `scalpel view` - line-numbered file display.

use anyhow::Result;
use clap::Args;
use regex::RegexBuilder;
use scalpel_core::{Config, TextDocument};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
pub struct ViewArgs {
    /// File to view
    pub file: PathBuf,

    /// Show single line N
    #[arg(short, long, value_name = "N")]
    pub line: Option<i64>,

    /// Show lines START to END
    #[arg(short, long, num_args = 2, value_names = ["START", "END"])]
    pub range: Option<Vec<i64>>,

    /// Show first N lines
    #[arg(long, value_name = "N")]
    pub head: Option<usize>,

    /// Show last N lines
    #[arg(long, value_name = "N")]
    pub tail: Option<usize>,

    /// Show lines matching a pattern (case-insensitive regex)
    #[arg(long, value_name = "PATTERN")]
    pub grep: Option<String>,

    /// Show file info (lines, size, encoding)
    #[arg(long)]
    pub summary: bool,
}

pub fn run(config: &Config, args: ViewArgs) -> Result<ExitCode> {
    if args.summary {
        return summary(&args.file);
    }

    let doc = TextDocument::read(&args.file)?;
    let width = config.view.number_width;

    if let Some(line) = args.line {
        let total = doc.line_count();
        if line < 1 || line as usize > total {
            anyhow::bail!("line {line} out of range (file has {total} lines)");
        }
        format_lines(&doc.lines[line as usize - 1..line as usize], line as usize, width);
    } else if let Some(range) = &args.range {
        let (start, end) = clamp_range(range[0], range[1], doc.line_count())?;
        format_lines(&doc.lines[start - 1..end], start, width);
    } else if let Some(count) = args.head {
        let count = count.min(doc.line_count());
        format_lines(&doc.lines[..count], 1, width);
    } else if let Some(count) = args.tail {
        let total = doc.line_count();
        let count = count.min(total);
        let start = total - count;
        format_lines(&doc.lines[start..], start + 1, width);
    } else if let Some(pattern) = &args.grep {
        return grep(&doc, pattern, width);
    } else {
        view_all(&doc, config.view.max_lines, width);
    }

    Ok(ExitCode::SUCCESS)
}

/// Print lines with right-aligned 1-based numbers: `{num:>width} | {text}`.
fn format_lines(lines: &[String], start_num: usize, width: usize) {
    for (offset, line) in lines.iter().enumerate() {
        let text = line.trim_end_matches(['\n', '\r']);
        println!("{:>width$} | {}", start_num + offset, text);
    }
}

fn view_all(doc: &TextDocument, max_lines: usize, width: usize) {
    let total = doc.line_count();
    if total > max_lines {
        eprintln!(
            "WARNING: file has {total} lines, showing first {max_lines} (use -r for range)"
        );
        format_lines(&doc.lines[..max_lines], 1, width);
        eprintln!("\n... truncated ({} more lines)", total - max_lines);
    } else {
        format_lines(&doc.lines, 1, width);
    }
}

/// Clamp start/end into the document, then reject impossible ranges.
fn clamp_range(start: i64, end: i64, total: usize) -> Result<(usize, usize)> {
    let start = start.max(1) as usize;
    let end = (end.max(0) as usize).min(total);

    if start > total {
        anyhow::bail!("start line {start} out of range (file has {total} lines)");
    }
    if start > end {
        anyhow::bail!("start ({start}) > end ({end})");
    }

    Ok((start, end))
}

fn grep(doc: &TextDocument, pattern: &str, width: usize) -> Result<ExitCode> {
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| anyhow::anyhow!("invalid pattern: {err}"))?;

    let mut found = 0;
    for (index, line) in doc.lines.iter().enumerate() {
        if regex.is_match(line) {
            let text = line.trim_end_matches(['\n', '\r']);
            println!("{:>width$} | {}", index + 1, text);
            found += 1;
        }
    }

    if found == 0 {
        eprintln!("No matches for '{pattern}'");
        return Ok(ExitCode::FAILURE);
    }

    eprintln!("\n{found} match(es)");
    Ok(ExitCode::SUCCESS)
}

fn summary(file: &PathBuf) -> Result<ExitCode> {
    if !file.is_file() {
        anyhow::bail!("file not found: {}", file.display());
    }

    let size = std::fs::metadata(file)?.len();
    let doc = TextDocument::read(file)?;
    let bytes = std::fs::read(file)?;

    println!("File:  {}", file.display());
    println!("Lines: {}", doc.line_count());
    println!("Size:  {}", format_size(size));
    println!("Encoding: {}", doc.encoding);

    // NUL in the first kilobyte is a good-enough binary sniff.
    let probe = &bytes[..bytes.len().min(1024)];
    if probe.contains(&0) {
        println!("Type:  binary");
    } else {
        println!("Type:  text");
    }

    Ok(ExitCode::SUCCESS)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
