//! Error types for ghdash

use thiserror::Error;

/// Result type alias for ghdash core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for ghdash core operations
///
/// The view engine itself never fails; these errors come from loading
/// configuration and secrets.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
