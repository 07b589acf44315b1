//! In-memory line-oriented documents.

use crate::encoding::{self, EncodingTag};
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::Path;

/// A file's content as an ordered sequence of lines, each retaining its
/// original terminator (`\n`, `\r\n`, or `\r`; a final line may carry none),
/// plus the encoding the bytes were read with.
///
/// Concatenating all lines reproduces the decoded content exactly; the
/// stripped leading byte-order mark is tracked by the encoding tag, not the
/// lines. Line numbers are 1-based.
#[derive(Debug, Clone)]
pub struct TextDocument {
    pub lines: Vec<String>,
    pub encoding: EncodingTag,
}

impl TextDocument {
    /// An empty UTF-8 document, the starting point when a missing file may
    /// be created by an edit.
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            encoding: EncodingTag::Utf8,
        }
    }

    /// Read and decode a file, splitting it into terminator-preserving
    /// lines.
    pub fn read(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::file_not_found(path));
        }

        let (content, encoding) = encoding::read_to_string(path)?;
        Ok(Self {
            lines: split_lines(&content),
            encoding,
        })
    }

    /// Write the document back using the encoding it was read with.
    pub fn write(&self, path: &Path) -> CoreResult<()> {
        let bytes = encoding::encode(&self.content(), self.encoding);
        fs::write(path, bytes)?;
        Ok(())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Concatenation of all lines.
    pub fn content(&self) -> String {
        self.lines.concat()
    }
}

/// Split on line boundaries, keeping each terminator attached so that
/// concatenating the result reproduces the input.
pub fn split_lines(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    // Terminators are ASCII, so byte indexing stays on char boundaries.
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(content[start..=i].to_string());
                i += 1;
                start = i;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(content[start..=end].to_string());
                i = end + 1;
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(content[start..].to_string());
    }

    lines
}
