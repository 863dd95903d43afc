//! Webhook signing and delivery implementation.

use crate::traits::EventPublisher;
use crate::types::EventEnvelope;
use crate::{PublishError, Result};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Webhook sink configuration
#[derive(Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub secret: [u8; 32],
    pub timeout: Duration,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>, secret: [u8; 32]) -> Self {
        Self {
            url: url.into(),
            secret,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Sign webhook payload with HMAC-SHA256
///
/// # Format
/// Signature covers: `{event_id}.{timestamp}.{json_payload}`
///
/// # Returns
/// * Signature in format: `sha256=<hex>`
pub fn sign_webhook(envelope: &EventEnvelope, webhook_secret: &[u8; 32]) -> Result<String> {
    let json_payload = serde_json::to_string(envelope)
        .map_err(|e| PublishError::Serialization(e.to_string()))?;

    let payload = format!(
        "{}.{}.{}",
        envelope.event_id, envelope.timestamp, json_payload
    );

    let mut mac = HmacSha256::new_from_slice(webhook_secret)
        .map_err(|e| PublishError::PublishFailed(format!("HMAC initialization failed: {}", e)))?;
    mac.update(payload.as_bytes());

    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Verify webhook signature (constant-time)
pub fn verify_webhook_signature(
    envelope: &EventEnvelope,
    signature: &str,
    webhook_secret: &[u8; 32],
) -> bool {
    let expected = match sign_webhook(envelope, webhook_secret) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    signature.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Publisher that POSTs each event to a single webhook URL
///
/// One attempt per event. A non-2xx answer or a transport error fails the
/// publish.
pub struct WebhookPublisher {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookPublisher {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EventPublisher for WebhookPublisher {
    async fn publish(&self, topic: &str, routing_key: &str, payload: &[u8]) -> Result<()> {
        let envelope = EventEnvelope::new(topic, routing_key, payload)?;
        let signature = sign_webhook(&envelope, &self.config.secret)?;

        let response = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .header("X-UserService-Event-Id", envelope.event_id.to_string())
            .header("X-UserService-Signature", signature)
            .header("X-UserService-Timestamp", envelope.timestamp.to_string())
            .header("X-UserService-Topic", topic)
            .header("X-UserService-Routing-Key", routing_key)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::PublishFailed(format!(
                "webhook answered {}",
                status
            )));
        }

        tracing::debug!(routing_key, event_id = %envelope.event_id, "Webhook delivered");
        Ok(())
    }
}
