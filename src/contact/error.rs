//! Contact error types.

use std::path::PathBuf;

use thiserror::Error;

/// Rejections of a contact submission before it reaches the ledger or relay.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("company must not be empty")]
    MissingCompany,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message exceeds {limit} characters")]
    MessageTooLong { limit: usize },
}

/// Failures of the mail-relay uplink. The ledger entry survives either way.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay was unreachable.
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered non-2xx; `message` is the backend's own error text.
    #[error("relay rejected the inquiry ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Failures of the local inquiry ledger file.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("inquiry ledger I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("inquiry ledger at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inquiry ledger serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
