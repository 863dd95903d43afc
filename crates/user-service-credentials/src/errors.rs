use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Credential service not initialized")]
    NotReady,

    #[error("Token signing failed: {0}")]
    SigningFailure(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Invalid verification key: {0}")]
    InvalidKey(String),

    #[error("Secret hashing failed: {0}")]
    SecretHashing(String),
}

pub type Result<T> = std::result::Result<T, CredentialError>;
