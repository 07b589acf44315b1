//! Snapshot error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Target file is missing.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The target file has no snapshots at all.
    #[error("no backups found for {}", .0.display())]
    NoBackups(PathBuf),

    /// No snapshot name contains the requested tag.
    #[error("no backup with tag '{0}' found")]
    TagNotFound(String),

    /// Error from the core codec while reading files for a diff.
    #[error(transparent)]
    Core(#[from] scalpel_core::CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SnapshotError {
    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Create a no backups error.
    pub fn no_backups(path: impl Into<PathBuf>) -> Self {
        Self::NoBackups(path.into())
    }

    /// Create a tag not found error.
    pub fn tag_not_found(tag: impl Into<String>) -> Self {
        Self::TagNotFound(tag.into())
    }
}
