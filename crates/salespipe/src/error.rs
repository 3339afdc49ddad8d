//! Error types for the salespipe library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for salespipe operations.
#[derive(Debug, Error)]
pub enum SalespipeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required source file does not exist.
    ///
    /// Distinct from a general IO failure so callers can report
    /// "source missing" before any transform work starts.
    #[error("source file not found: '{path}'")]
    MissingSource { path: PathBuf },

    /// A source row failed validation at the extraction boundary.
    #[error("invalid row {row} in '{path}': {message}")]
    InvalidRow {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Table name is not a plain SQL identifier.
    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),

    /// Error from the storage engine.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Model training or scoring error.
    #[error("model error: {0}")]
    Model(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for salespipe operations.
pub type Result<T> = std::result::Result<T, SalespipeError>;
