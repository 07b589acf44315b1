//! Line-range edit engine with automatic pre-edit snapshots.
//!
//! Every mutating operation runs Validate -> Backup -> Mutate -> Persist.
//! Validation failures abort before any backup or write, so either the
//! whole operation completes and is written, or nothing is written.

use crate::error::{ToolError, ToolResult};
use scalpel_core::config::{BackupConfig, EditConfig};
use scalpel_core::TextDocument;
use scalpel_snapshot::SnapshotStore;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A single line-addressed mutation. Line numbers are 1-based, ranges are
/// inclusive, and an omitted range end defaults to its start.
#[derive(Debug, Clone, Copy)]
pub enum EditOp {
    /// Replace the line range with the new content; the replacement may
    /// hold a different number of lines than the range it removes.
    Replace { start: i64, end: Option<i64> },
    /// Insert before the given line; `total + 1` appends at end of file.
    Insert { line: i64 },
    /// Insert immediately after the given line, which must exist.
    Append { line: i64 },
    /// Delete the line range.
    Delete { start: i64, end: Option<i64> },
}

/// Per-call switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditOptions {
    /// Skip the automatic pre-edit snapshot for this call.
    pub skip_backup: bool,
    /// Bypass the large-delete gate.
    pub force: bool,
}

/// Outcome of a successful edit.
#[derive(Debug)]
pub struct EditOutcome {
    /// One-line human-readable confirmation.
    pub message: String,
    /// Path of the pre-edit snapshot, when one was taken.
    pub backup: Option<PathBuf>,
    /// Diagnostic when the snapshot attempt failed; the edit proceeded.
    pub backup_warning: Option<String>,
}

/// The edit engine. Holds borrowed configuration and the snapshot store;
/// the in-memory document lives only for the duration of one `apply`.
pub struct EditEngine<'a> {
    edit: &'a EditConfig,
    backup: &'a BackupConfig,
    store: &'a SnapshotStore,
}

impl<'a> EditEngine<'a> {
    pub fn new(edit: &'a EditConfig, backup: &'a BackupConfig, store: &'a SnapshotStore) -> Self {
        Self {
            edit,
            backup,
            store,
        }
    }

    /// Apply one operation to `path` and persist the result.
    pub fn apply(
        &self,
        path: &Path,
        op: &EditOp,
        new_lines: Vec<String>,
        opts: EditOptions,
    ) -> ToolResult<EditOutcome> {
        let mut doc = self.read_document(path)?;

        match *op {
            EditOp::Replace { start, end } => {
                self.replace(path, &mut doc, start, end, new_lines, opts)
            }
            EditOp::Insert { line } => self.insert(path, &mut doc, line, new_lines, opts),
            EditOp::Append { line } => self.append(path, &mut doc, line, new_lines, opts),
            EditOp::Delete { start, end } => self.delete(path, &mut doc, start, end, opts),
        }
    }

    fn replace(
        &self,
        path: &Path,
        doc: &mut TextDocument,
        start: i64,
        end: Option<i64>,
        new_lines: Vec<String>,
        opts: EditOptions,
    ) -> ToolResult<EditOutcome> {
        let (start, end) = validate_range(start, end, doc.line_count())?;
        let (backup, backup_warning) = self.snapshot_before(path, opts);

        let count = new_lines.len();
        doc.lines.splice(start - 1..end, new_lines);
        doc.write(path)?;

        let mut message = if start == end {
            format!("replaced line {start} in {}", path.display())
        } else {
            format!(
                "replaced lines {start}-{end} with {count} line(s) in {}",
                path.display()
            )
        };
        if !opts.skip_backup && self.backup.enabled {
            message.push_str(" (backup saved)");
        }

        Ok(EditOutcome {
            message,
            backup,
            backup_warning,
        })
    }

    fn insert(
        &self,
        path: &Path,
        doc: &mut TextDocument,
        line: i64,
        new_lines: Vec<String>,
        opts: EditOptions,
    ) -> ToolResult<EditOutcome> {
        let total = doc.line_count();
        if line < 1 || line as usize > total + 1 {
            return Err(ToolError::InsertOutOfRange {
                line,
                max: total + 1,
            });
        }

        let (backup, backup_warning) = self.snapshot_before(path, opts);

        let count = new_lines.len();
        let index = line as usize - 1;
        doc.lines.splice(index..index, new_lines);
        doc.write(path)?;

        Ok(EditOutcome {
            message: format!(
                "inserted {count} line(s) before line {line} in {}",
                path.display()
            ),
            backup,
            backup_warning,
        })
    }

    fn append(
        &self,
        path: &Path,
        doc: &mut TextDocument,
        line: i64,
        new_lines: Vec<String>,
        opts: EditOptions,
    ) -> ToolResult<EditOutcome> {
        validate_line(line, doc.line_count(), "line")?;
        let (backup, backup_warning) = self.snapshot_before(path, opts);

        let count = new_lines.len();
        let index = line as usize;
        doc.lines.splice(index..index, new_lines);
        doc.write(path)?;

        Ok(EditOutcome {
            message: format!(
                "inserted {count} line(s) after line {line} in {}",
                path.display()
            ),
            backup,
            backup_warning,
        })
    }

    fn delete(
        &self,
        path: &Path,
        doc: &mut TextDocument,
        start: i64,
        end: Option<i64>,
        opts: EditOptions,
    ) -> ToolResult<EditOutcome> {
        let (start, end) = validate_range(start, end, doc.line_count())?;

        let count = end - start + 1;
        if count > self.edit.confirm_large_delete && !opts.force {
            return Err(ToolError::LargeDeleteRejected {
                count,
                max: self.edit.confirm_large_delete,
            });
        }

        let (backup, backup_warning) = self.snapshot_before(path, opts);

        doc.lines.drain(start - 1..end);
        doc.write(path)?;

        let message = if start == end {
            format!("deleted line {start} from {}", path.display())
        } else {
            format!(
                "deleted lines {start}-{end} ({count} lines) from {}",
                path.display()
            )
        };

        Ok(EditOutcome {
            message,
            backup,
            backup_warning,
        })
    }

    fn read_document(&self, path: &Path) -> ToolResult<TextDocument> {
        if !path.is_file() {
            if self.edit.create_if_missing {
                return Ok(TextDocument::empty());
            }
            return Err(ToolError::FileNotFound(path.to_path_buf()));
        }

        Ok(TextDocument::read(path)?)
    }

    /// Take the pre-edit snapshot unless suppressed for this call or
    /// disabled process-wide (a silent skip). Failure never blocks the
    /// edit: it surfaces as a warning on the outcome and in the log.
    fn snapshot_before(&self, path: &Path, opts: EditOptions) -> (Option<PathBuf>, Option<String>) {
        if opts.skip_backup || !self.backup.enabled {
            return (None, None);
        }

        match self.store.save(path, None) {
            Ok(dest) => (Some(dest), None),
            Err(err) => {
                warn!(file = %path.display(), %err, "pre-edit backup failed");
                (None, Some(format!("backup failed: {err}")))
            }
        }
    }
}

/// Split raw content into terminator-carrying lines.
///
/// Each produced line gains a `\n`; the single trailing empty segment
/// produced by a final terminator in the input is dropped, so `"a\nb\n"`
/// yields two lines. With `expand_escapes`, literal `\n` two-character
/// sequences become real line breaks first, supporting multi-line content
/// passed as one shell token; the raw stdin channel bypasses expansion.
pub fn parse_content(raw: &str, expand_escapes: bool) -> Vec<String> {
    let raw = if expand_escapes {
        raw.replace("\\n", "\n")
    } else {
        raw.to_string()
    };

    let mut lines: Vec<String> = raw.split('\n').map(|part| format!("{part}\n")).collect();

    if raw.ends_with('\n') && lines.len() > 1 && lines.last().map(String::as_str) == Some("\n") {
        lines.pop();
    }

    lines
}

fn validate_line(line: i64, total: usize, label: &'static str) -> ToolResult<()> {
    if line < 1 || line as usize > total {
        return Err(ToolError::OutOfRange { label, line, total });
    }
    Ok(())
}

fn validate_range(start: i64, end: Option<i64>, total: usize) -> ToolResult<(usize, usize)> {
    let end = end.unwrap_or(start);
    validate_line(start, total, "start line")?;
    validate_line(end, total, "end line")?;

    if start > end {
        return Err(ToolError::InvalidRange { start, end });
    }

    Ok((start as usize, end as usize))
}
