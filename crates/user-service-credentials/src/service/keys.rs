//! Signing key generation for the credential service.

use crate::{errors::*, verifier::TokenVerifier};
use ed25519_dalek::SigningKey;
use jsonwebtoken::EncodingKey;
use zeroize::Zeroizing;

use super::{generate_random_bytes, sha256};

/// PKCS#8 v1 prefix for a raw Ed25519 seed
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Signing and verification halves of the process key pair
pub(crate) struct KeyMaterial {
    pub(crate) encoding_key: EncodingKey,
    pub(crate) verifier: TokenVerifier,
}

impl KeyMaterial {
    /// Generate a fresh key pair from OS randomness
    pub(crate) fn generate(issuer: String) -> Result<Self> {
        let seed = Zeroizing::new(generate_random_bytes::<32>());
        Self::from_seed(&seed, issuer)
    }

    pub(crate) fn from_seed(seed: &[u8; 32], issuer: String) -> Result<Self> {
        let signing_key = SigningKey::from_bytes(seed);
        let public_key = signing_key.verifying_key().to_bytes();

        let mut pkcs8_der = Zeroizing::new(Vec::with_capacity(48));
        pkcs8_der.extend_from_slice(&PKCS8_ED25519_PREFIX);
        pkcs8_der.extend_from_slice(seed);

        let encoding_key = EncodingKey::from_ed_der(&pkcs8_der);
        let verifier = TokenVerifier::from_public_key(public_key, Some(issuer))
            .map_err(|e| CredentialError::KeyGeneration(e.to_string()))?;

        Ok(Self {
            encoding_key,
            verifier,
        })
    }
}

/// Key ID for a public key: first 8 bytes of its SHA-256, hex encoded
pub fn key_id(public_key: &[u8; 32]) -> String {
    hex::encode(&sha256(public_key)[..8])
}
