use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort the processing of a single source file.
///
/// None of these are fatal to the polling loop: the watcher logs them at the
/// file boundary and moves on to the next candidate.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to read spreadsheet {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Missing required column: {column} in {path}")]
    Schema { path: PathBuf, column: String },

    #[error("Token request failed (status {}): {reason}", display_status(.status))]
    Auth { status: Option<u16>, reason: String },

    #[error("Batch {batch} failed (status {}): {reason}", display_status(.status))]
    Upload {
        batch: usize,
        status: Option<u16>,
        reason: String,
    },

    #[error("File operation failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }

    /// Number of batches the remote service accepted before this error.
    ///
    /// Batches go out one at a time and the first failure stops the file, so
    /// for an upload failure this is always `batch - 1`.
    pub fn batches_sent(&self) -> usize {
        match self {
            SyncError::Upload { batch, .. } => batch.saturating_sub(1),
            _ => 0,
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string())
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;
