//! Orchestrator error taxonomy.

use thiserror::Error;
use user_service_credentials::CredentialError;
use user_service_events::PublishError;
use user_service_storage::StoreError;

/// User service errors
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Username already taken
    #[error("User already exists: {0}")]
    Conflict(String),

    /// No such user
    #[error("User not found: {0}")]
    NotFound(String),

    /// Bad credentials or an invalid session token
    #[error("Unauthorized")]
    Unauthorized,

    /// Request failed field validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store failed or timed out
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Event could not be published
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// Credential service used before initialization
    #[error("Credential service not ready")]
    NotReady,

    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    /// Input is not a token
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Anything else operational
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserServiceError {
    /// Whether this is an expected business outcome rather than a fault
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            UserServiceError::Conflict(_)
                | UserServiceError::NotFound(_)
                | UserServiceError::Unauthorized
                | UserServiceError::InvalidInput(_)
        )
    }
}

impl From<StoreError> for UserServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(username) => UserServiceError::Conflict(username),
            StoreError::NotFound(username) => UserServiceError::NotFound(username),
            StoreError::Unavailable(msg) => UserServiceError::StoreUnavailable(msg),
        }
    }
}

impl From<CredentialError> for UserServiceError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotReady => UserServiceError::NotReady,
            CredentialError::SigningFailure(msg) => UserServiceError::SigningFailure(msg),
            CredentialError::MalformedToken(msg) => UserServiceError::MalformedToken(msg),
            other => UserServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PublishError> for UserServiceError {
    fn from(err: PublishError) -> Self {
        UserServiceError::PublishFailed(err.to_string())
    }
}

/// Result type for user service operations
pub type Result<T> = std::result::Result<T, UserServiceError>;
