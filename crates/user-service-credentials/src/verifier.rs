//! Public-key-only token verification.

use crate::{errors::*, types::*};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::service::{base64_url_encode, key_id};

/// Verifies tokens against a single Ed25519 public key
///
/// The credential service holds one of these next to its signing key. It can
/// also be built from a published JWK, so a deployment that only needs to
/// check tokens never has to hold the private half.
#[derive(Clone)]
pub struct TokenVerifier {
    kid: String,
    public_key: [u8; 32],
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl TokenVerifier {
    /// Build a verifier from raw Ed25519 public key bytes
    pub fn from_public_key(public_key: [u8; 32], issuer: Option<String>) -> Result<Self> {
        let decoding_key = DecodingKey::from_ed_components(&base64_url_encode(&public_key))
            .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;

        Ok(Self {
            kid: key_id(&public_key),
            public_key,
            decoding_key,
            issuer,
        })
    }

    /// Build a verifier from an OKP/Ed25519 JSON Web Key
    pub fn from_jwk(jwk: &JsonWebKey, issuer: Option<String>) -> Result<Self> {
        if jwk.kty != "OKP" || jwk.crv != "Ed25519" {
            return Err(CredentialError::InvalidKey(format!(
                "unsupported key type {}/{}",
                jwk.kty, jwk.crv
            )));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(&jwk.x)
            .map_err(|e| CredentialError::InvalidKey(e.to_string()))?;
        let public_key: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CredentialError::InvalidKey("public key must be 32 bytes".to_string()))?;

        Self::from_public_key(public_key, issuer)
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Export the key as a JWK
    pub fn jwk(&self) -> JsonWebKey {
        JsonWebKey {
            kty: "OKP".to_string(),
            use_: Some("sig".to_string()),
            alg: Some("EdDSA".to_string()),
            kid: Some(self.kid.clone()),
            crv: "Ed25519".to_string(),
            x: base64_url_encode(&self.public_key),
        }
    }

    /// Check a token's signature, issuer and expiry at time `now`
    pub fn verify(&self, token: &str, now: u64) -> Result<Option<TokenClaims>> {
        // Parse header WITHOUT verification
        let header =
            decode_header(token).map_err(|e| CredentialError::MalformedToken(e.to_string()))?;

        if header.alg != Algorithm::EdDSA {
            tracing::debug!(alg = ?header.alg, "Rejected token with foreign algorithm");
            return Ok(None);
        }

        // Expiry is checked against the injected clock below, without leeway
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let claims = match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => data.claims,
            Err(e) => return classify(e),
        };

        if now >= claims.exp {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, now, "Token expired");
            return Ok(None);
        }

        Ok(Some(claims))
    }
}

/// Split decode failures into "not a token" and "a token that does not verify"
fn classify(err: jsonwebtoken::errors::Error) -> Result<Option<TokenClaims>> {
    match err.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => Err(CredentialError::MalformedToken(err.to_string())),
        _ => {
            tracing::debug!(error = %err, "Token failed verification");
            Ok(None)
        }
    }
}
