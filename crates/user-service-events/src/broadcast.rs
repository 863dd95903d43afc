//! In-process broadcast of published events.

use crate::traits::EventPublisher;
use crate::types::EventEnvelope;
use crate::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Default number of events buffered for slow subscribers
pub const DEFAULT_CAPACITY: usize = 256;

/// Publisher that fans events out to in-process subscribers
///
/// Each subscriber gets its own receiver. Subscribers that fall more than the
/// channel capacity behind lose the oldest events. Publishing with no
/// subscribers is not an error.
pub struct BroadcastPublisher {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()> {
        let envelope = EventEnvelope::new(topic, routing_key, payload)?;

        match self.sender.send(envelope) {
            Ok(receivers) => {
                tracing::debug!(routing_key, receivers, "Broadcast event");
            }
            Err(_) => {
                tracing::trace!(routing_key, "No subscribers for event");
            }
        }

        Ok(())
    }
}
