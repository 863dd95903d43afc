//! User secret hashing with Argon2id.

use crate::errors::*;
use argon2::password_hash::{Error as PasswordHashError, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use tokio::sync::OnceCell;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HasherParams {
    /// OWASP minimum for Argon2id: 19 MiB, 2 passes, 1 lane
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HasherParams {
    /// Smallest cost argon2 accepts, for tests
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| CredentialError::SecretHashing(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes and verifies user secrets
///
/// Hashing is CPU bound, so every call runs on the blocking pool. Stored
/// hashes are PHC strings and carry their own parameters, so verification
/// keeps working after the configured cost changes.
pub struct SecretHasher {
    params: HasherParams,
    decoy: OnceCell<String>,
}

impl SecretHasher {
    pub fn new(params: HasherParams) -> Result<Self> {
        // Reject bad parameters up front rather than on the first request
        params.argon2()?;

        Ok(Self {
            params,
            decoy: OnceCell::new(),
        })
    }

    pub fn params(&self) -> HasherParams {
        self.params
    }

    /// Hash a secret into a PHC string
    pub async fn hash(&self, secret: &str) -> Result<String> {
        let params = self.params;
        let secret = zeroize::Zeroizing::new(secret.to_string());

        tokio::task::spawn_blocking(move || hash_blocking(&params, secret.as_bytes()))
            .await
            .map_err(|e| CredentialError::SecretHashing(e.to_string()))?
    }

    /// Check a secret against a stored PHC string
    pub async fn verify(&self, secret: &str, phc: &str) -> Result<bool> {
        let secret = zeroize::Zeroizing::new(secret.to_string());
        let phc = phc.to_string();

        tokio::task::spawn_blocking(move || verify_blocking(secret.as_bytes(), &phc))
            .await
            .map_err(|e| CredentialError::SecretHashing(e.to_string()))?
    }

    /// Spend one verification on a throwaway hash and report a mismatch
    ///
    /// Used when there is no stored hash to compare against, so the caller
    /// takes about as long as a real mismatch.
    pub async fn verify_decoy(&self, secret: &str) -> Result<bool> {
        let decoy = self
            .decoy
            .get_or_try_init(|| async {
                let filler = hex::encode(crate::generate_random_bytes::<16>());
                self.hash(&filler).await
            })
            .await?;

        self.verify(secret, decoy).await?;
        Ok(false)
    }
}

fn hash_blocking(params: &HasherParams, secret: &[u8]) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());

    let hash = params
        .argon2()?
        .hash_password(secret, &salt)
        .map_err(|e| CredentialError::SecretHashing(e.to_string()))?;

    Ok(hash.to_string())
}

fn verify_blocking(secret: &[u8], phc: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(phc).map_err(|e| CredentialError::SecretHashing(e.to_string()))?;

    match Argon2::default().verify_password(secret, &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(CredentialError::SecretHashing(e.to_string())),
    }
}
