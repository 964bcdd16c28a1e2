//! Error types for the layout optimization engine.

use thiserror::Error;

/// Errors that can occur during layout optimization.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid room, furniture, or GA configuration. Raised before any
    /// generation runs.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The classifier artifact could not be loaded or does not match the
    /// feature contract. Callers recover by substituting a neutral score.
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// IO error (classifier artifact, room layout files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
