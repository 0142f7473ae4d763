//! Watched folder layout and routing moves.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::decode::strip_utf8_bom;
use crate::error::{IngestError, Result};

/// Folder for files that passed validation.
pub const SUCCESS_DIR: &str = "success";
/// Folder for rejected files.
pub const ERROR_DIR: &str = "error";
/// Folder for summary and detail logs.
pub const LOGS_DIR: &str = "logs";

/// Where a processed file ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Success,
    Error,
}

/// The watched folder and its routing subfolders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchLayout {
    root: PathBuf,
}

impl WatchLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn success_dir(&self) -> PathBuf {
        self.root.join(SUCCESS_DIR)
    }

    pub fn error_dir(&self) -> PathBuf {
        self.root.join(ERROR_DIR)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }

    pub fn dir_for(&self, destination: Destination) -> PathBuf {
        match destination {
            Destination::Success => self.success_dir(),
            Destination::Error => self.error_dir(),
        }
    }

    /// Create the watched folder and its subfolders if missing.
    pub fn ensure(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.success_dir(),
            self.error_dir(),
            self.logs_dir(),
        ] {
            if !dir.is_dir() {
                std::fs::create_dir_all(&dir).map_err(|e| IngestError::DirectoryCreate {
                    path: dir.clone(),
                    source: e,
                })?;
                info!(path = %dir.display(), "Created directory");
            }
        }
        Ok(())
    }

    /// Move `file` into the success or error folder.
    ///
    /// An existing file of the same name is never overwritten; the moved
    /// file gets a numbered name instead. Returns the new path.
    pub fn route(&self, file: &Path, destination: Destination) -> Result<PathBuf> {
        let dir = self.dir_for(destination);
        let stem = file_stem(file);
        let extension = file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("csv");
        let target = dir.join(unique_file_name(&dir, &stem, extension));

        std::fs::rename(file, &target).map_err(|e| IngestError::FileMove {
            from: file.to_path_buf(),
            to: target.clone(),
            source: e,
        })?;
        debug!(from = %file.display(), to = %target.display(), "Routed file");
        Ok(target)
    }
}

/// File stem as a string, lossily converted.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// First free name of the form `base.ext`, `base_1.ext`, `base_2.ext`, ...
pub fn unique_file_name(dir: &Path, base: &str, extension: &str) -> String {
    let mut name = format!("{base}.{extension}");
    let mut counter = 1;
    while dir.join(&name).exists() {
        name = format!("{base}_{counter}.{extension}");
        counter += 1;
    }
    name
}

/// Write a copy of `bytes` without its UTF-8 byte-order mark next to `original`.
///
/// The copy is named `<stem>_edited.csv` (numbered if taken). Returns its path.
pub fn write_bom_free_copy(original: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let dir = original.parent().unwrap_or_else(|| Path::new("."));
    let base = format!("{}_edited", file_stem(original));
    let target = dir.join(unique_file_name(dir, &base, "csv"));

    let (body, _) = strip_utf8_bom(bytes);
    std::fs::write(&target, body).map_err(|e| IngestError::FileWrite {
        path: target.clone(),
        source: e,
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_folders() {
        let dir = TempDir::new().unwrap();
        let layout = WatchLayout::new(dir.path().join("watch_folder"));
        layout.ensure().unwrap();

        assert!(layout.success_dir().is_dir());
        assert!(layout.error_dir().is_dir());
        assert!(layout.logs_dir().is_dir());
        // Idempotent.
        layout.ensure().unwrap();
    }

    #[test]
    fn test_unique_file_name() {
        let dir = TempDir::new().unwrap();
        assert_eq!(unique_file_name(dir.path(), "contacts", "txt"), "contacts.txt");

        std::fs::write(dir.path().join("contacts.txt"), "").unwrap();
        assert_eq!(unique_file_name(dir.path(), "contacts", "txt"), "contacts_1.txt");

        std::fs::write(dir.path().join("contacts_1.txt"), "").unwrap();
        assert_eq!(unique_file_name(dir.path(), "contacts", "txt"), "contacts_2.txt");
    }

    #[test]
    fn test_route_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let layout = WatchLayout::new(dir.path());
        layout.ensure().unwrap();

        std::fs::write(layout.error_dir().join("points.csv"), "old").unwrap();
        let incoming = dir.path().join("points.csv");
        std::fs::write(&incoming, "new").unwrap();

        let routed = layout.route(&incoming, Destination::Error).unwrap();
        assert_eq!(routed.file_name().unwrap(), "points_1.csv");
        assert!(!incoming.exists());
        assert_eq!(std::fs::read_to_string(layout.error_dir().join("points.csv")).unwrap(), "old");
    }

    #[test]
    fn test_route_missing_file() {
        let dir = TempDir::new().unwrap();
        let layout = WatchLayout::new(dir.path());
        layout.ensure().unwrap();

        let result = layout.route(&dir.path().join("gone.csv"), Destination::Success);
        assert!(matches!(result, Err(IngestError::FileMove { .. })));
    }

    #[test]
    fn test_bom_free_copy() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("vouchers.csv");
        let bytes = b"\xEF\xBB\xBFuserId\n";
        std::fs::write(&original, bytes).unwrap();

        let copy = write_bom_free_copy(&original, bytes).unwrap();
        assert_eq!(copy.file_name().unwrap(), "vouchers_edited.csv");
        assert_eq!(std::fs::read(&copy).unwrap(), b"userId\n");

        let second = write_bom_free_copy(&original, bytes).unwrap();
        assert_eq!(second.file_name().unwrap(), "vouchers_edited_1.csv");
    }
}
