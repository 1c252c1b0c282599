//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the history snapshot failed.
    #[error("trial history I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The history snapshot on disk is not valid JSON for a trial list.
    #[error("trial history at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the in-memory history for persistence failed.
    #[error("trial history serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
