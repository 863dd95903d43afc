//! Event envelope shared by the in-process and webhook transports.

use crate::{PublishError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published lifecycle event as delivered to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique per publish call
    pub event_id: Uuid,

    /// Exchange the event was published to
    pub topic: String,

    /// Routing key, e.g. `users.new`
    pub routing_key: String,

    /// Unix timestamp (seconds) of publication
    pub timestamp: i64,

    /// Decoded JSON payload
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Wrap a JSON payload published under `topic`/`routing_key`
    pub fn new(topic: &str, routing_key: &str, payload: &[u8]) -> Result<Self> {
        let payload = serde_json::from_slice(payload)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        Ok(Self {
            event_id: Uuid::new_v4(),
            topic: topic.to_string(),
            routing_key: routing_key.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            payload,
        })
    }
}
