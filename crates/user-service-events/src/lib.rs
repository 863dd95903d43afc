//! # user-service-events
//!
//! Lifecycle event publication for the user service.
//!
//! ## Responsibilities
//!
//! - The `EventPublisher` contract: `publish(topic, routing_key, payload)`
//! - In-process broadcast feeding Server-Sent Events subscribers
//! - Signed webhook delivery
//! - Fan-out to several publishers at once

pub mod broadcast;
pub mod errors;
pub mod fanout;
pub mod testing;
pub mod traits;
pub mod types;
pub mod webhook;

pub use broadcast::BroadcastPublisher;
pub use errors::{PublishError, Result};
pub use fanout::FanoutPublisher;
pub use testing::{FailingPublisher, PublishedMessage, RecordingPublisher};
pub use traits::{EventPublisher, NoOpEventPublisher};
pub use types::*;
pub use webhook::{sign_webhook, verify_webhook_signature, WebhookConfig, WebhookPublisher};
