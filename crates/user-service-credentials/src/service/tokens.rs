//! Token issuance for the credential service.

use crate::{clock::Clock, errors::*, types::*};
use jsonwebtoken::{encode, Algorithm, Header};
use uuid::Uuid;

use super::JwtCredentialService;

/// Generate random bytes of the specified length
pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// URL-safe base64 encoding without padding
pub fn base64_url_encode(data: &[u8]) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    URL_SAFE_NO_PAD.encode(data)
}

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

impl<C: Clock> JwtCredentialService<C> {
    /// Sign a token for `subject` with the current key
    pub(super) fn issue_internal(&self, subject: &str) -> Result<IssuedToken> {
        let material = self.key_material()?;
        let claims = self.build_token_claims(subject);

        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(material.verifier.kid().to_string());

        let token = encode(&header, &claims, &material.encoding_key)
            .map_err(|e| CredentialError::SigningFailure(e.to_string()))?;

        Ok(IssuedToken {
            token,
            subject: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    fn build_token_claims(&self, subject: &str) -> TokenClaims {
        let now = self.clock.now();

        TokenClaims {
            iss: self.config.issuer.clone(),
            sub: subject.to_string(),
            iat: now,
            exp: now + self.config.ttl_seconds,
            jti: Uuid::new_v4().to_string(),
        }
    }
}
