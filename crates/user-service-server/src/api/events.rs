use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use user_service_events::EventEnvelope;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventStreamParams {
    /// Only forward events with this routing key
    pub routing_key: Option<String>,
}

/// GET /api/v1/events/stream
///
/// Lifecycle events published after the client connects, as server-sent
/// events. A client too slow to keep up skips the events it missed.
pub async fn event_stream(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventStreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let filter = params.routing_key;

    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(move |received| {
        let envelope = match received {
            Ok(envelope) => envelope,
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event stream subscriber lagged");
                return None;
            }
        };

        if filter.as_deref().is_some_and(|key| key != envelope.routing_key) {
            return None;
        }

        to_sse_event(&envelope).map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse_event(envelope: &EventEnvelope) -> Option<Event> {
    match serde_json::to_string(envelope) {
        Ok(json) => Some(
            Event::default()
                .id(envelope.event_id.to_string())
                .event(envelope.routing_key.as_str())
                .data(json),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode event for stream");
            None
        }
    }
}
