//! Error types for event publication.

use thiserror::Error;

/// Result type alias for publish operations
pub type Result<T> = std::result::Result<T, PublishError>;

/// Event publication errors
#[derive(Debug, Error)]
pub enum PublishError {
    /// The transport did not accept the event
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
