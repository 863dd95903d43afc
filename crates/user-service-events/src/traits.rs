//! Trait definitions for event publication.

use crate::Result;
use async_trait::async_trait;

/// Lifecycle event publisher
///
/// Delivery is best-effort and at-most-once. A returned error means this
/// attempt failed; nothing is retried or queued.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `payload` (JSON bytes) to `topic` under `routing_key`
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()>;
}

/// No-op event publisher for testing
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _topic: &str, _routing_key: &str, _payload: &[u8]) -> Result<()> {
        Ok(())
    }
}
