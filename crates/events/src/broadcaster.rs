//! Live-update fan-out to connected observers.
//!
//! [`EventBroadcaster`] keeps one unbounded channel per subscriber and pushes
//! every [`ProgressEvent`] into all of them. There is no replay buffer: a
//! subscriber only sees events broadcast while it is registered.
//!
//! The lock is a `std::sync::RwLock` because broadcasting happens from
//! synchronous logging code; no lock is ever held across an `.await`.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::task::{Context, Poll};

use chrono::Utc;
use lagar_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// ProgressEvent
// ---------------------------------------------------------------------------

/// One line of live output, as sent to observers.
///
/// Serializes to `{"message": "...", "timestamp": "<RFC 3339>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub message: String,
    pub timestamp: Timestamp,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            message: message.into(),
            timestamp,
        }
    }

    /// Create an event stamped with the current time.
    pub fn now(message: impl Into<String>) -> Self {
        Self::new(message, Utc::now())
    }
}

// ---------------------------------------------------------------------------
// EventBroadcaster
// ---------------------------------------------------------------------------

/// Identifies one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

type EventSender = mpsc::UnboundedSender<ProgressEvent>;

/// Registry of live subscribers. Share it as `Arc<EventBroadcaster>`.
pub struct EventBroadcaster {
    subscribers: RwLock<HashMap<SubscriptionHandle, EventSender>>,
    next_id: AtomicU64,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new subscriber.
    ///
    /// The returned [`Subscription`] unsubscribes itself when dropped, so an
    /// HTTP stream that is torn down on client disconnect cleans up for free.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let handle = SubscriptionHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, tx);

        Subscription {
            handle,
            receiver: rx,
            broadcaster: Arc::downgrade(self),
        }
    }

    /// Remove a subscriber. Unknown or already-removed handles are a no-op.
    ///
    /// Returns `true` if the handle was registered.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle)
            .is_some()
    }

    /// Send `message` stamped with `timestamp` to every current subscriber.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub fn broadcast(&self, message: impl Into<String>, timestamp: Timestamp) -> usize {
        self.publish(ProgressEvent::new(message, timestamp))
    }

    /// Deliver an event to every current subscriber, best-effort.
    ///
    /// A subscriber whose receiving side is gone is skipped and pruned; it
    /// never stops delivery to the others and never surfaces as an error.
    pub fn publish(&self, event: ProgressEvent) -> usize {
        let mut delivered = 0;
        let mut dead = Vec::new();

        {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            for (handle, sender) in subscribers.iter() {
                match sender.send(event.clone()) {
                    Ok(()) => delivered += 1,
                    Err(_) => dead.push(*handle),
                }
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self
                .subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for handle in &dead {
                subscribers.remove(handle);
            }
            tracing::debug!(pruned = dead.len(), "Pruned closed subscribers");
        }

        delivered
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Receiving side of one subscriber.
///
/// Implements [`futures::Stream`] so it can back an SSE response directly.
pub struct Subscription {
    handle: SubscriptionHandle,
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
    broadcaster: Weak<EventBroadcaster>,
}

impl Subscription {
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }

    /// Wait for the next event. Returns `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.try_recv().ok()
    }
}

impl futures::Stream for Subscription {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(broadcaster) = self.broadcaster.upgrade() {
            broadcaster.unsubscribe(self.handle);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
