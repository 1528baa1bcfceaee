//! Live progress stream.
//!
//! GET /events
//!
//! Each broadcast line is one SSE `data:` frame holding
//! `{"message": ..., "timestamp": ...}`. Nothing is replayed: an observer
//! sees only lines published after it connected. The subscription is
//! released when the client disconnects and axum drops the stream, or when
//! the server begins shutting down.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::state::AppState;

pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.broadcaster.subscribe();
    tracing::debug!(
        subscribers = state.broadcaster.subscriber_count(),
        "Event stream opened",
    );

    let events = subscription
        .take_until(state.shutdown.clone().cancelled_owned())
        .filter_map(|event| async move {
            match Event::default().json_data(&event) {
                Ok(frame) => Some(Ok(frame)),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping unserializable progress event");
                    None
                }
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}
