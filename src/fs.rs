//! File system utilities.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, SyncError};

/// Whether `path` exists, following symlinks.
///
/// A dangling symlink counts as absent, as do missing parents and
/// permission-denied lookups.
pub fn path_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

/// Recursively create `dir`; an existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| SyncError::fs("create directory", dir, e))
}

/// Read a file to a string, or `None` if it does not exist.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::fs("read settings", path, e)),
    }
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).map_err(|e| SyncError::fs("write settings", path, e))
}
