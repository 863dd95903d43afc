//! Public-key-only verification tests.

use super::helpers::*;
use crate::*;

#[tokio::test]
async fn test_verifier_from_jwks_accepts_service_tokens() {
    let (service, _clock) = create_test_service().await;
    let issued = service.issue("bob").await.unwrap();

    let jwks = service.jwks().await.unwrap();
    let verifier =
        TokenVerifier::from_jwk(&jwks.keys[0], Some("user-service.test".to_string())).unwrap();

    let claims = verifier.verify(&issued.token, T0 + 10).unwrap().unwrap();
    assert_eq!(claims.sub, "bob");
    assert_eq!(verifier.kid(), jwks.keys[0].kid.as_deref().unwrap());

    assert!(verifier.verify(&issued.token, issued.expires_at).unwrap().is_none());
}

#[test]
fn test_jwk_shape() {
    let verifier = TokenVerifier::from_public_key([7u8; 32], None).unwrap();
    let json = serde_json::to_value(verifier.jwk()).unwrap();

    assert_eq!(json["kty"], "OKP");
    assert_eq!(json["crv"], "Ed25519");
    assert_eq!(json["alg"], "EdDSA");
    assert_eq!(json["use"], "sig");
    assert_eq!(json["x"], base64_url_encode(&[7u8; 32]));
}

#[test]
fn test_from_jwk_rejects_wrong_key_type() {
    let jwk = JsonWebKey {
        kty: "RSA".to_string(),
        use_: None,
        alg: None,
        kid: None,
        crv: "Ed25519".to_string(),
        x: base64_url_encode(&[1u8; 32]),
    };
    assert!(matches!(
        TokenVerifier::from_jwk(&jwk, None),
        Err(CredentialError::InvalidKey(_))
    ));
}

#[test]
fn test_from_jwk_rejects_short_key() {
    let jwk = JsonWebKey {
        kty: "OKP".to_string(),
        use_: None,
        alg: None,
        kid: None,
        crv: "Ed25519".to_string(),
        x: base64_url_encode(&[1u8; 16]),
    };
    assert!(matches!(
        TokenVerifier::from_jwk(&jwk, None),
        Err(CredentialError::InvalidKey(_))
    ));
}
