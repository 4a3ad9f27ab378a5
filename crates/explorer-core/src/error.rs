//! Error types for camera-explorer.

use thiserror::Error;

/// The main error type for camera-explorer operations.
///
/// Navigation, lens and session operations never fail; this covers the
/// ambient surfaces around them (configuration files, persistence).
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// An option value is out of its accepted range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// The persistence collaborator rejected an operation.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A project with the given id was not found.
    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for camera-explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
