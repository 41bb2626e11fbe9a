//! Error types for the wind-archive crate.

use std::path::PathBuf;

use netcdf_store::StoreError;
use thiserror::Error;

use crate::time::BaseDate;

/// Errors that can occur while merging wind archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Unknown archive source '{0}': expected one of era5, cfsr or gfs")]
    UnknownSource(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid time units '{units}': {reason}")]
    InvalidUnits { units: String, reason: String },

    #[error("Invalid timestamp '{0}': expected YYYYMMDDHH")]
    InvalidTimestamp(String),

    #[error("Invalid base date: {0}")]
    InvalidDate(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Base date mismatch: expected {expected}, found {found}")]
    BaseDateMismatch { expected: BaseDate, found: BaseDate },

    #[error("{file}: {source}")]
    InFile {
        file: String,
        source: Box<ArchiveError>,
    },

    #[error("No *.{extension} input files found in {}", dir.display())]
    NoInputFiles { dir: PathBuf, extension: String },

    #[error("Nothing to write: the merged series has no time steps")]
    EmptySeries,

    #[error("Failed to scan {}: {message}", dir.display())]
    Scan { dir: PathBuf, message: String },

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Attach the name of the input file being processed.
    pub fn in_file(self, file: &str) -> Self {
        ArchiveError::InFile {
            file: file.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping file context.
    pub fn root(&self) -> &ArchiveError {
        match self {
            ArchiveError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for wind-archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
