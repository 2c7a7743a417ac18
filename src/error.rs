//! Error types for the admin tools.
//!
//! Every failure surfaces as a human-readable message at the top level of
//! the running tool; errors are not classified beyond their message and are
//! never retried.

use thiserror::Error;

/// Result type alias for admin tool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by both admin tools
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// I/O error (stdin prompt, filesystem)
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
