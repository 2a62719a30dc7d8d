//! Common error types for the playlist app

use thiserror::Error;

/// Common result type for playlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the storage layer and the web front end
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A playlist with this name already exists; nothing was written
    #[error("Duplicate playlist name: {0}")]
    DuplicateName(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Not-found error for a missing row of `entity` with the given id
    pub fn not_found(entity: &str, id: i64) -> Self {
        Error::NotFound(format!("{} {}", entity, id))
    }
}
