//! Shared fixtures for credential service tests.

use crate::*;
use std::sync::Arc;

pub const T0: u64 = 1_700_000_000;

pub fn test_config() -> TokenConfig {
    TokenConfig {
        issuer: "user-service.test".to_string(),
        ttl_seconds: 86_400,
    }
}

/// Initialized service on a manual clock starting at `T0`
pub async fn create_test_service() -> (JwtCredentialService<ManualClock>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let service = JwtCredentialService::with_clock(test_config(), Arc::clone(&clock));
    service.initialize().await.unwrap();
    (service, clock)
}

/// Replace one character of the token at `index` with a different one
pub fn flip_char(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}
