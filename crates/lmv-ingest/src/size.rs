//! File size gating.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

const MB: u64 = 1024 * 1024;

/// Maximum accepted file size (500 MB).
pub const MAX_FILE_SIZE: u64 = 500 * MB;

/// Processing class derived from file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Normal,
    Medium,
    Large,
}

impl SizeClass {
    /// Medium and large files get row-count progress reporting.
    pub fn wants_progress(self) -> bool {
        self != Self::Normal
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Medium => f.write_str("medium"),
            Self::Large => f.write_str("large"),
        }
    }
}

/// Size thresholds in bytes. Each bound is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    /// Files above this are rejected without being decoded.
    pub max_bytes: u64,
    pub large_bytes: u64,
    pub medium_bytes: u64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_FILE_SIZE,
            large_bytes: 100 * MB,
            medium_bytes: 10 * MB,
        }
    }
}

impl SizeLimits {
    /// Classify a size, or `None` when it exceeds the ceiling.
    pub fn classify(&self, size: u64) -> Option<SizeClass> {
        if size > self.max_bytes {
            None
        } else if size > self.large_bytes {
            Some(SizeClass::Large)
        } else if size > self.medium_bytes {
            Some(SizeClass::Medium)
        } else {
            Some(SizeClass::Normal)
        }
    }
}

/// Check file size before loading.
///
/// Returns the size and its class, or [`IngestError::FileTooLarge`].
pub fn check_file_size(path: &Path, limits: &SizeLimits) -> Result<(u64, SizeClass)> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::read(path, e))?;
    let size = metadata.len();

    match limits.classify(size) {
        Some(class) => Ok((size, class)),
        None => Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: limits.max_bytes,
        }),
    }
}

/// Human-readable size: bytes, KB, or MB with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} bytes")
    } else if bytes < MB {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    }
}
