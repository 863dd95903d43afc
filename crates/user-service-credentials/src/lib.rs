//! # user-service-credentials
//!
//! Credential handling for the user service: an Ed25519 key pair held for the
//! process lifetime, JWT issuance and validation against it, and Argon2id
//! hashing of user secrets.

pub mod clock;
pub mod errors;
pub mod secret;
mod service;
pub mod traits;
pub mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::*;
pub use secret::{HasherParams, SecretHasher};
pub use service::{base64_url_encode, generate_random_bytes, key_id, sha256, JwtCredentialService};
pub use traits::*;
pub use types::*;
pub use verifier::TokenVerifier;
