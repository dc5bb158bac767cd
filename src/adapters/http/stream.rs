//! Server-sent event stream over the event bus.
//!
//! Each connection owns one subscription. Events are narrowed to the
//! connection's session and user here, after delivery; the bus itself
//! fans every event out to every subscriber. Dropping the stream (client
//! disconnect) unsubscribes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures::{stream, Stream, StreamExt};
use serde::Deserialize;

use super::context::SessionHeader;
use super::error::ApiError;
use super::state::AppState;
use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::notification::Event;
use crate::ports::{EventSubscriber, Subscription, SubscriptionId};

/// Keep-alive goes out as an SSE comment line, never as a named `ping` event.
const KEEP_ALIVE_TEXT: &str = "keep-alive";

/// Which events a connection wants.
#[derive(Debug, Clone)]
pub struct StreamFilter {
    session_id: SessionId,
    user_id: Option<UserId>,
}

impl StreamFilter {
    /// Without a user every event passes.
    pub fn new(session_id: SessionId, user_id: Option<UserId>) -> Self {
        Self {
            session_id,
            user_id,
        }
    }

    pub fn accepts(&self, event: &Event) -> bool {
        match &self.user_id {
            Some(user) => event.is_addressed_to(&self.session_id, user),
            None => true,
        }
    }
}

struct SubscriptionGuard {
    subscriber: Arc<dyn EventSubscriber>,
    id: SubscriptionId,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.subscriber.unsubscribe(self.id) {
            tracing::debug!(subscription = %self.id, "Event stream closed");
        }
    }
}

/// Subscribes and yields the events that pass `filter`, ending when the bus
/// closes the queue.
pub fn filtered_events(
    subscriber: Arc<dyn EventSubscriber>,
    filter: StreamFilter,
) -> impl Stream<Item = Arc<Event>> + Send {
    let subscription = subscriber.subscribe();
    let guard = SubscriptionGuard {
        subscriber,
        id: subscription.id(),
    };
    tracing::debug!(subscription = %guard.id, session_id = %filter.session_id, "Event stream opened");

    stream::unfold(
        (subscription, guard, filter),
        |(mut subscription, guard, filter): (Subscription, SubscriptionGuard, StreamFilter)| async move {
            loop {
                let event = subscription.receive().await?;
                if filter.accepts(&event) {
                    return Some((event, (subscription, guard, filter)));
                }
            }
        },
    )
}

/// JSON body of one `message` frame.
pub fn frame_payload(event: &Event) -> serde_json::Value {
    serde_json::json!({
        "type": event.kind(),
        "session_id": event.session_id(),
        "targets": event.targets(),
        "data": event.data(),
    })
}

fn to_sse(event: &Event) -> SseEvent {
    SseEvent::default()
        .event("message")
        .data(frame_payload(event).to_string())
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    pub user_id: Option<String>,
}

/// GET /api/v1/mails/events - Live notification stream
pub async fn stream_events(
    State(state): State<AppState>,
    SessionHeader(session_id): SessionHeader,
    Query(params): Query<StreamParams>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    let user_id = match params.user_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            Some(UserId::new(raw).map_err(|e| ApiError::Domain(DomainError::from(e)))?)
        }
        _ => None,
    };

    let filter = StreamFilter::new(session_id, user_id);
    let events = filtered_events(state.subscriber.clone(), filter)
        .map(|event| Ok::<_, Infallible>(to_sse(&event)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(state.settings.keep_alive)
            .text(KEEP_ALIVE_TEXT),
    ))
}
