//! Common error types for MMO

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for MMO operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across MMO crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or supplied JSON could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two media paths sanitize to the same sidecar file
    #[error("Sidecar {file} belongs to {stored_path}, not {requested_path}")]
    PathCollision {
        file: PathBuf,
        stored_path: String,
        requested_path: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors the adapters treat as "absence" rather than failure
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
