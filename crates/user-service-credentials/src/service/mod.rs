//! Credential service implementation.

mod keys;
mod tokens;

use crate::{clock::*, errors::*, traits::*, types::*};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub(crate) use keys::KeyMaterial;
pub use keys::key_id;
pub use tokens::{base64_url_encode, generate_random_bytes, sha256};

/// JWT credential service backed by one in-memory Ed25519 key pair
///
/// The key pair is generated by `initialize` and lives as long as the
/// service. Tokens signed by a previous process do not verify after restart.
pub struct JwtCredentialService<C: Clock = SystemClock> {
    pub(super) config: TokenConfig,
    pub(super) clock: Arc<C>,
    pub(super) keys: OnceCell<KeyMaterial>,
}

impl JwtCredentialService<SystemClock> {
    /// Create a credential service reading the wall clock
    pub fn new(config: TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }
}

impl<C: Clock> JwtCredentialService<C> {
    /// Create a credential service with a custom time source
    pub fn with_clock(config: TokenConfig, clock: Arc<C>) -> Self {
        Self {
            config,
            clock,
            keys: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Key material, or `NotReady` before `initialize`
    pub(super) fn key_material(&self) -> Result<&KeyMaterial> {
        self.keys.get().ok_or(CredentialError::NotReady)
    }
}

#[async_trait]
impl<C: Clock + 'static> CredentialService for JwtCredentialService<C> {
    async fn initialize(&self) -> Result<()> {
        let issuer = self.config.issuer.clone();
        let material = self
            .keys
            .get_or_try_init(|| async move { KeyMaterial::generate(issuer) })
            .await?;

        tracing::info!(kid = %material.verifier.kid(), "Credential service initialized");
        Ok(())
    }

    async fn issue(&self, subject: &str) -> Result<IssuedToken> {
        self.issue_internal(subject)
    }

    async fn verify(&self, token: &str) -> Result<Option<TokenClaims>> {
        let material = self.key_material()?;
        material.verifier.verify(token, self.clock.now())
    }

    async fn jwks(&self) -> Result<JwksResponse> {
        let material = self.key_material()?;
        Ok(JwksResponse {
            keys: vec![material.verifier.jwk()],
        })
    }
}
