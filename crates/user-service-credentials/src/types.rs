use serde::{Deserialize, Serialize};

/// Token issuance settings
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Value of the `iss` claim, checked on validation
    pub issuer: String,
    /// Validity window in seconds
    pub ttl_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: "user-service".to_string(),
            ttl_seconds: 86_400,
        }
    }
}

/// JWT token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub iss: String, // Issuer
    pub sub: String, // Subject (username)
    pub iat: u64,    // Issued at
    pub exp: u64,    // Expiration
    pub jti: String, // JWT ID
}

/// A freshly signed bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub subject: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// JWKS response for public key distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwksResponse {
    pub keys: Vec<JsonWebKey>,
}

/// JSON Web Key for the JWKS endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kty: String, // Key type: "OKP"
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>, // "sig"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>, // "EdDSA"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>, // Key ID
    pub crv: String, // Curve: "Ed25519"
    pub x: String,   // Base64url encoded public key
}
