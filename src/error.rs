//! Error types for openclaw-sync

use std::path::PathBuf;
use thiserror::Error;

/// Operator-facing errors, each mapped to a stable exit code.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A required input file is missing
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A document could not be read or is not a valid JSON object
    #[error("failed to parse {}: {}", path.display(), reason)]
    Parse { path: PathBuf, reason: String },

    /// Conflicting or invalid flag combination
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The target or backup file could not be written
    #[error("failed to write {}: {}", path.display(), reason)]
    Write { path: PathBuf, reason: String },

    /// The model daemon could not be reached or rejected a request
    #[error("daemon error: {0}")]
    Daemon(String),
}

impl SyncError {
    /// Exit code reported to the shell. Parse/flag problems and write
    /// failures get distinct codes so wrapper scripts can tell them apart.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::NotFound(_) | SyncError::Parse { .. } | SyncError::Configuration(_) => 2,
            SyncError::Write { .. } => 3,
            SyncError::Daemon(_) => 4,
        }
    }
}
