//! Error types for projection and sync runs.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a sync run or of a single target's projection.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Unknown target: {name}. Use one of: {valid}")]
    UnknownTarget { name: String, valid: String },

    #[error("Failed to parse existing settings {}: {message}", path.display())]
    SettingsParse { path: PathBuf, message: String },

    #[error("Failed to serialize settings {}: {message}", path.display())]
    SettingsSerialize { path: PathBuf, message: String },

    #[error("Refusing to replace non-symlink at {}", path.display())]
    SkillLinkConflict { path: PathBuf },

    #[error("Duplicate skill name: {name}")]
    DuplicateSkillName { name: String },

    #[error("Failed to {op} {}: {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Wrap an I/O error with the operation and path it came from.
    pub fn fs(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        SyncError::Filesystem {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
