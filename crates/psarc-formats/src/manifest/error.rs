//! Manifest error types

use thiserror::Error;

/// Errors raised while reading or updating manifest JSON
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Invalid JSON
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Required field absent
    #[error("manifest field missing: {0}")]
    MissingField(&'static str),

    /// Field present but not a JSON object
    #[error("manifest field is not an object: {0}")]
    NotAnObject(String),
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
