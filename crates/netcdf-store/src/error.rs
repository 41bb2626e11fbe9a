//! Error types for gridded store access.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for reading gridded stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The container could not be opened
    #[error("Failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },

    /// Missing required variable
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// The variable exists but its values could not be read
    #[error("Failed to read variable '{name}': {message}")]
    Read { name: String, message: String },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}
