//! Delivery to several publishers at once.

use crate::traits::EventPublisher;
use crate::{PublishError, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Publishes every event to each of its sinks
///
/// All sinks are attempted even when an earlier one fails. The call fails if
/// any sink failed, with the failures joined into one message.
#[derive(Default)]
pub struct FanoutPublisher {
    sinks: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventPublisher>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()> {
        let mut failures = Vec::new();

        for sink in &self.sinks {
            if let Err(e) = sink.publish(topic, routing_key, payload).await {
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PublishError::PublishFailed(failures.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingPublisher, RecordingPublisher};

    #[tokio::test]
    async fn test_delivers_to_every_sink() {
        let a = Arc::new(RecordingPublisher::new());
        let b = Arc::new(RecordingPublisher::new());
        let fanout = FanoutPublisher::new()
            .with_sink(a.clone())
            .with_sink(b.clone());

        fanout.publish("t", "users.count", b"2").await.unwrap();

        assert_eq!(a.routing_keys(), vec!["users.count"]);
        assert_eq!(b.routing_keys(), vec!["users.count"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_skip_later_sinks() {
        let recorder = Arc::new(RecordingPublisher::new());
        let fanout = FanoutPublisher::new()
            .with_sink(Arc::new(FailingPublisher::always()))
            .with_sink(recorder.clone());

        let result = fanout.publish("t", "users.new", b"{}").await;

        assert!(matches!(result, Err(PublishError::PublishFailed(_))));
        assert_eq!(recorder.routing_keys(), vec!["users.new"]);
    }

    #[tokio::test]
    async fn test_empty_fanout_succeeds() {
        let fanout = FanoutPublisher::new();
        assert!(fanout.is_empty());
        fanout.publish("t", "users.new", b"{}").await.unwrap();
    }
}
