//! Tool error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during edit or search operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Target file is missing.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Search root is missing.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Line index outside the document.
    #[error("{label} {line} out of range (file has {total} lines)")]
    OutOfRange {
        label: &'static str,
        line: i64,
        total: usize,
    },

    /// Insertion point outside `[1, total + 1]`.
    #[error("line {line} out of range (valid: 1-{max})")]
    InsertOutOfRange { line: i64, max: usize },

    /// Range start after range end.
    #[error("start ({start}) > end ({end})")]
    InvalidRange { start: i64, end: i64 },

    /// Delete size exceeds the safety threshold without an override.
    #[error("refusing to delete {count} lines (max {max}); use --force to override")]
    LargeDeleteRejected { count: usize, max: usize },

    /// Unusable search pattern.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Error from the core codec.
    #[error(transparent)]
    Core(#[from] scalpel_core::CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
