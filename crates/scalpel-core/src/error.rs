//! Core error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur reading, decoding, or writing files.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Target file is missing.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Byte stream cannot be decoded under its detected encoding.
    #[error("cannot decode file: {0}")]
    Encoding(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    /// Create an encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }
}
