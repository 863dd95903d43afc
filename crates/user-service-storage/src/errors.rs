//! Storage error types.

use thiserror::Error;

/// Key-value engine errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Invalid column family
    #[error("Invalid column family: {0}")]
    InvalidColumnFamily(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// User store contract errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this username already exists
    #[error("User already exists: {0}")]
    AlreadyExists(String),

    /// No record with this username
    #[error("User not found: {0}")]
    NotFound(String),

    /// Transient failure of the underlying engine
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type for user store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
