//! Publisher doubles for exercising publish paths.

use crate::traits::EventPublisher;
use crate::{PublishError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded `publish` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub routing_key: String,
    pub payload: Vec<u8>,
}

impl PublishedMessage {
    /// Payload decoded as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload).unwrap_or(serde_json::Value::Null)
    }
}

/// Records every publish call and always succeeds
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.recorded().clone()
    }

    pub fn routing_keys(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .map(|m| m.routing_key)
            .collect()
    }

    /// Recorded messages, even if a panicking thread poisoned the lock
    fn recorded(&self) -> MutexGuard<'_, Vec<PublishedMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()> {
        self.recorded().push(PublishedMessage {
            topic: topic.to_string(),
            routing_key: routing_key.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

/// Fails publishes for selected routing keys, recording the rest
#[derive(Default)]
pub struct FailingPublisher {
    failing_keys: Option<HashSet<String>>,
    delivered: RecordingPublisher,
}

impl FailingPublisher {
    /// Fail every publish
    pub fn always() -> Self {
        Self::default()
    }

    /// Fail only publishes under the given routing keys
    pub fn for_keys(keys: &[&str]) -> Self {
        Self {
            failing_keys: Some(keys.iter().map(|k| k.to_string()).collect()),
            delivered: RecordingPublisher::new(),
        }
    }

    /// Publishes that were let through
    pub fn delivered(&self) -> Vec<PublishedMessage> {
        self.delivered.messages()
    }

    fn fails(&self, routing_key: &str) -> bool {
        match &self.failing_keys {
            None => true,
            Some(keys) => keys.contains(routing_key),
        }
    }
}

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()> {
        if self.fails(routing_key) {
            return Err(PublishError::PublishFailed(format!(
                "transport rejected {}",
                routing_key
            )));
        }
        self.delivered.publish(topic, routing_key, payload).await
    }
}
