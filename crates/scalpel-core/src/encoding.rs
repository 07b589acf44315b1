//! Encoding detection and the byte-level text codec.
//!
//! A file's encoding is detected once on read and reused verbatim on write,
//! so an edit cycle never silently changes how a file is stored on disk.

use crate::error::{CoreError, CoreResult};
use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};
use std::fmt;
use std::fs;
use std::path::Path;

/// Detected text encoding of a file, including byte-order-mark presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingTag {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    /// Narrow 8-bit fallback; every byte maps to a character, so detection
    /// never fails outright.
    Windows1252,
}

impl EncodingTag {
    pub fn name(&self) -> &'static str {
        match self {
            EncodingTag::Utf8 => "utf-8",
            EncodingTag::Utf8Bom => "utf-8 (bom)",
            EncodingTag::Utf16Le => "utf-16le",
            EncodingTag::Utf16Be => "utf-16be",
            EncodingTag::Utf32Le => "utf-32le",
            EncodingTag::Utf32Be => "utf-32be",
            EncodingTag::Windows1252 => "windows-1252",
        }
    }

    /// The byte-order mark this tag carries, empty for the markless tags.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            EncodingTag::Utf8 | EncodingTag::Windows1252 => &[],
            EncodingTag::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            EncodingTag::Utf16Le => &[0xFF, 0xFE],
            EncodingTag::Utf16Be => &[0xFE, 0xFF],
            EncodingTag::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            EncodingTag::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }
}

impl fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Probe order matters: the UTF-32LE mark begins with the UTF-16LE mark.
const BOMS: &[(&[u8], EncodingTag)] = &[
    (&[0xFF, 0xFE, 0x00, 0x00], EncodingTag::Utf32Le),
    (&[0x00, 0x00, 0xFE, 0xFF], EncodingTag::Utf32Be),
    (&[0xFF, 0xFE], EncodingTag::Utf16Le),
    (&[0xFE, 0xFF], EncodingTag::Utf16Be),
    (&[0xEF, 0xBB, 0xBF], EncodingTag::Utf8Bom),
];

/// Detect the encoding of a byte stream.
///
/// Marker-carrying encodings are unambiguous and checked first; otherwise a
/// strict UTF-8 decode is attempted, and the 8-bit fallback absorbs the rest.
pub fn detect(bytes: &[u8]) -> EncodingTag {
    for (bom, tag) in BOMS {
        if bytes.starts_with(bom) {
            return *tag;
        }
    }

    if std::str::from_utf8(bytes).is_ok() {
        EncodingTag::Utf8
    } else {
        EncodingTag::Windows1252
    }
}

/// Decode `bytes` under `tag`, stripping the leading byte-order mark.
pub fn decode(bytes: &[u8], tag: EncodingTag) -> CoreResult<String> {
    let body = bytes.get(tag.bom().len()..).unwrap_or(&[]);

    match tag {
        EncodingTag::Utf8 | EncodingTag::Utf8Bom => std::str::from_utf8(body)
            .map(str::to_string)
            .map_err(|_| CoreError::encoding("invalid UTF-8 byte stream")),
        EncodingTag::Utf16Le => decode_utf16(body, UTF_16LE),
        EncodingTag::Utf16Be => decode_utf16(body, UTF_16BE),
        EncodingTag::Utf32Le => decode_utf32(body, u32::from_le_bytes),
        EncodingTag::Utf32Be => decode_utf32(body, u32::from_be_bytes),
        EncodingTag::Windows1252 => {
            let (content, _) = WINDOWS_1252.decode_without_bom_handling(body);
            Ok(content.into_owned())
        }
    }
}

fn decode_utf16(bytes: &[u8], encoding: &'static encoding_rs::Encoding) -> CoreResult<String> {
    let (content, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(CoreError::encoding(format!(
            "invalid {} byte stream",
            encoding.name()
        )));
    }
    Ok(content.into_owned())
}

fn decode_utf32(bytes: &[u8], read: fn([u8; 4]) -> u32) -> CoreResult<String> {
    let mut chunks = bytes.chunks_exact(4);
    let mut out = String::with_capacity(bytes.len() / 4);

    for chunk in &mut chunks {
        let code = read([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match char::from_u32(code) {
            Some(ch) => out.push(ch),
            None => {
                return Err(CoreError::encoding(format!(
                    "invalid UTF-32 scalar value {code:#x}"
                )))
            }
        }
    }

    if !chunks.remainder().is_empty() {
        return Err(CoreError::encoding("truncated UTF-32 sequence"));
    }

    Ok(out)
}

/// Encode `content` under `tag`, re-emitting the byte-order mark the tag
/// carries. No newline normalization happens here: whatever terminators the
/// content holds are what is written.
pub fn encode(content: &str, tag: EncodingTag) -> Vec<u8> {
    let mut out = Vec::from(tag.bom());

    match tag {
        EncodingTag::Utf8 | EncodingTag::Utf8Bom => out.extend_from_slice(content.as_bytes()),
        EncodingTag::Utf16Le => {
            for unit in content.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
        }
        EncodingTag::Utf16Be => {
            for unit in content.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        EncodingTag::Utf32Le => {
            for ch in content.chars() {
                out.extend_from_slice(&(ch as u32).to_le_bytes());
            }
        }
        EncodingTag::Utf32Be => {
            for ch in content.chars() {
                out.extend_from_slice(&(ch as u32).to_be_bytes());
            }
        }
        EncodingTag::Windows1252 => {
            let (bytes, _, _) = WINDOWS_1252.encode(content);
            out.extend_from_slice(&bytes);
        }
    }

    out
}

/// Read a file, detect its encoding, and decode it.
pub fn read_to_string(path: &Path) -> CoreResult<(String, EncodingTag)> {
    let bytes = fs::read(path)?;
    let tag = detect(&bytes);
    let content = decode(&bytes, tag)?;
    Ok((content, tag))
}
