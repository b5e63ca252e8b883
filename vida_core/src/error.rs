//! Error types for the vida_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vida_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required field is missing or failed coercion; the operation was
    /// aborted with no mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Edit/delete target id does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Snapshot store failure (non-fatal; in-memory state stays authoritative)
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
