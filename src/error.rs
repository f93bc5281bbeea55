//! Error types shared across the viewer
//!
//! `DriveError` covers every failure an external drive collaborator can
//! report. `StorageError` covers the local key/value store used for the
//! recent-files list.

use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a drive collaborator call
///
/// Cloneable so fetch results can travel inside UI messages.
#[derive(Debug, Clone, Error)]
pub enum DriveError {
    /// The requested file or folder does not exist (or is not an image)
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not signed in or lacks the required scopes
    #[error("authorization failed: {0}")]
    Auth(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The owning session was closed before the call completed
    #[error("request cancelled")]
    Cancelled,

    /// Local I/O failure (filesystem-backed drives)
    #[error("i/o error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for DriveError {
    fn from(err: std::io::Error) -> Self {
        DriveError::Io(Arc::new(err))
    }
}

impl DriveError {
    /// Cancellation is not a user-visible failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DriveError::Cancelled)
    }
}

/// Failure of the local key/value store or of (de)serializing its values
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid stored value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine user data directory")]
    NoDataDir,
}
