//! Auth error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("name must not be empty")]
    InvalidName,

    #[error("company must not be empty")]
    InvalidCompany,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password must be at least {minimum} characters")]
    WeakPassword { minimum: usize },

    /// Registration with an email that already exists (case-insensitive).
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("no account with this email")]
    UnknownEmail,

    #[error("incorrect password")]
    WrongPassword,

    /// Reading or writing the user directory file failed.
    #[error("user directory I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user directory file on disk is not valid JSON.
    #[error("user directory at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("user directory serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
