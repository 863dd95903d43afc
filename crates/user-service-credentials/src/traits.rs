use crate::{JwksResponse, IssuedToken, Result, TokenClaims};
use async_trait::async_trait;

/// Credential service trait for token operations
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Generate the signing key pair
    ///
    /// Must complete before any issue or validate call. Concurrent first calls
    /// produce a single key pair; later calls are no-ops.
    async fn initialize(&self) -> Result<()>;

    /// Sign a token for `subject`, valid for the configured window
    async fn issue(&self, subject: &str) -> Result<IssuedToken>;

    /// Verify a token and return its claims
    ///
    /// `Ok(None)` for a well-formed token that is expired, tampered, signed by
    /// another key or with another algorithm. `Err(MalformedToken)` when the
    /// input is not a token at all.
    async fn verify(&self, token: &str) -> Result<Option<TokenClaims>>;

    /// Whether `token` is currently valid
    async fn validate(&self, token: &str) -> Result<bool> {
        Ok(self.verify(token).await?.is_some())
    }

    /// Public key set for external verifiers
    async fn jwks(&self) -> Result<JwksResponse>;
}
