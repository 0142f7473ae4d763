//! Byte-level decoding of migration files.

use std::fmt;
use std::path::Path;

use encoding_rs::WINDOWS_1252;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Encoding the text was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Legacy single-byte fallback.
    Windows1252,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Windows1252 => "Windows-1252",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded file content.
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// Text with any UTF-8 byte-order mark removed.
    pub text: String,
    pub encoding: TextEncoding,
    /// True if the file started with a UTF-8 byte-order mark.
    pub had_bom: bool,
}

/// Read a whole file into memory.
///
/// This is a sync function meant to be called from the blocking watch loop.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| IngestError::read(path, e))
}

/// Split a leading UTF-8 byte-order mark off `bytes`.
pub fn strip_utf8_bom(bytes: &[u8]) -> (&[u8], bool) {
    match bytes.strip_prefix(UTF8_BOM) {
        Some(rest) => (rest, true),
        None => (bytes, false),
    }
}

/// Reject byte-order marks of encodings that are never accepted.
///
/// UTF-16 files would decode as Windows-1252 garbage rather than fail, so
/// they are caught up front.
pub fn validate_encoding(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    Ok(())
}

/// Decode file content as UTF-8, falling back to Windows-1252.
pub fn decode_bytes(path: &Path, bytes: &[u8]) -> Result<DecodedText> {
    validate_encoding(path, bytes)?;

    let (body, had_bom) = strip_utf8_bom(bytes);
    if had_bom {
        debug!(path = %path.display(), "UTF-8 byte-order mark present");
    }

    if let Ok(text) = std::str::from_utf8(body) {
        return Ok(DecodedText {
            text: text.to_string(),
            encoding: TextEncoding::Utf8,
            had_bom,
        });
    }

    warn!(path = %path.display(), "UTF-8 decoding failed, retrying as Windows-1252");
    match WINDOWS_1252.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Ok(DecodedText {
            text: text.into_owned(),
            encoding: TextEncoding::Windows1252,
            had_bom,
        }),
        None => Err(IngestError::Undecodable {
            path: path.to_path_buf(),
        }),
    }
}
