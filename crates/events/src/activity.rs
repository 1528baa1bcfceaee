//! The operational log that observers watch live.
//!
//! Every component writes human-readable progress lines through an
//! [`ActivityLog`] instead of calling `tracing` directly for them. The log
//! stamps each line once and hands the same [`LogEntry`] to every registered
//! [`LogSink`], so the process log, the live stream and the push collector
//! all carry an identical timestamp.

use std::sync::Arc;

use chrono::Utc;
use lagar_core::types::Timestamp;

use crate::broadcaster::{EventBroadcaster, ProgressEvent};
use crate::delivery::push::PushDelivery;

/// Prefix put in front of error lines on the live stream.
pub const ERROR_PREFIX: &str = "ERROR: ";

// ---------------------------------------------------------------------------
// LogEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

/// One stamped log line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: Timestamp,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// The text shown to observers: error lines carry [`ERROR_PREFIX`].
    pub fn display_message(&self) -> String {
        match self.level {
            LogLevel::Info => self.message.clone(),
            LogLevel::Error => format!("{ERROR_PREFIX}{}", self.message),
        }
    }

    pub fn to_event(&self) -> ProgressEvent {
        ProgressEvent::new(self.display_message(), self.timestamp)
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// A destination for log lines. Implementations must not block and must
/// swallow their own failures.
pub trait LogSink: Send + Sync {
    fn emit(&self, entry: &LogEntry);
}

/// Writes lines to the process log through `tracing`.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry) {
        let timestamp = entry.timestamp.to_rfc3339();
        match entry.level {
            LogLevel::Info => tracing::info!(target: "lagar::activity", %timestamp, "{}", entry.message),
            LogLevel::Error => {
                tracing::error!(target: "lagar::activity", %timestamp, "{}", entry.message)
            }
        }
    }
}

/// Pushes lines to every live subscriber.
pub struct BroadcastSink {
    broadcaster: Arc<EventBroadcaster>,
}

impl BroadcastSink {
    pub fn new(broadcaster: Arc<EventBroadcaster>) -> Self {
        Self { broadcaster }
    }
}

impl LogSink for BroadcastSink {
    fn emit(&self, entry: &LogEntry) {
        self.broadcaster.publish(entry.to_event());
    }
}

/// Forwards info lines to an external collector, fire-and-forget.
///
/// Needs a Tokio runtime to spawn the request; outside one the line is
/// dropped. Error lines are not forwarded.
pub struct PushSink {
    delivery: PushDelivery,
}

impl PushSink {
    pub fn new(delivery: PushDelivery) -> Self {
        Self { delivery }
    }
}

impl LogSink for PushSink {
    fn emit(&self, entry: &LogEntry) {
        if entry.level != LogLevel::Info {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let delivery = self.delivery.clone();
        let event = entry.to_event();
        runtime.spawn(async move {
            if let Err(e) = delivery.deliver(&event).await {
                tracing::debug!(error = %e, "Log push failed");
            }
        });
    }
}

// ---------------------------------------------------------------------------
// ActivityLog
// ---------------------------------------------------------------------------

/// Cheaply cloneable handle to the set of log sinks.
#[derive(Clone, Default)]
pub struct ActivityLog {
    sinks: Arc<Vec<Arc<dyn LogSink>>>,
}

impl ActivityLog {
    pub fn builder() -> ActivityLogBuilder {
        ActivityLogBuilder::default()
    }

    /// The sink set both binaries use: process log, live stream, and the
    /// optional push collector.
    pub fn standard(broadcaster: Arc<EventBroadcaster>, push: Option<PushDelivery>) -> Self {
        let mut builder = Self::builder()
            .with_sink(TracingSink)
            .with_sink(BroadcastSink::new(broadcaster));
        if let Some(delivery) = push {
            builder = builder.with_sink(PushSink::new(delivery));
        }
        builder.build()
    }

    /// The sink set for a process without live observers: process log and
    /// the optional push collector.
    pub fn headless(push: Option<PushDelivery>) -> Self {
        let mut builder = Self::builder().with_sink(TracingSink);
        if let Some(delivery) = push {
            builder = builder.with_sink(PushSink::new(delivery));
        }
        builder.build()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(&LogEntry::new(LogLevel::Info, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(&LogEntry::new(LogLevel::Error, message));
    }

    /// Hand an already stamped entry to every sink.
    pub fn emit(&self, entry: &LogEntry) {
        for sink in self.sinks.iter() {
            sink.emit(entry);
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

#[derive(Default)]
pub struct ActivityLogBuilder {
    sinks: Vec<Arc<dyn LogSink>>,
}

impl ActivityLogBuilder {
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    pub fn build(self) -> ActivityLog {
        ActivityLog {
            sinks: Arc::new(self.sinks),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default, Clone)]
    struct Capture(Arc<Mutex<Vec<LogEntry>>>);

    impl LogSink for Capture {
        fn emit(&self, entry: &LogEntry) {
            self.0.lock().unwrap().push(entry.clone());
        }
    }

    #[test]
    fn error_lines_are_prefixed_for_observers() {
        let entry = LogEntry::new(LogLevel::Error, "Seed failed");
        assert_eq!(entry.display_message(), "ERROR: Seed failed");

        let entry = LogEntry::new(LogLevel::Info, "Seed started");
        assert_eq!(entry.display_message(), "Seed started");
    }

    #[test]
    fn every_sink_sees_the_same_entry() {
        let first = Capture::default();
        let second = Capture::default();
        let log = ActivityLog::builder()
            .with_sink(first.clone())
            .with_sink(second.clone())
            .build();

        log.info("Creating companies");

        let a = first.0.lock().unwrap();
        let b = second.0.lock().unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(*a, *b);
    }

    #[test]
    fn broadcast_sink_reuses_log_timestamp() {
        let broadcaster = Arc::new(EventBroadcaster::new());
        let mut sub = broadcaster.subscribe();
        let capture = Capture::default();
        let log = ActivityLog::builder()
            .with_sink(capture.clone())
            .with_sink(BroadcastSink::new(Arc::clone(&broadcaster)))
            .build();

        log.error("disk full");

        let logged = capture.0.lock().unwrap()[0].clone();
        let event = sub.try_recv().expect("subscriber should receive the line");
        assert_eq!(event.timestamp, logged.timestamp);
        assert_eq!(event.message, "ERROR: disk full");
    }

    #[test]
    fn standard_log_without_push_has_two_sinks() {
        let log = ActivityLog::standard(Arc::new(EventBroadcaster::new()), None);
        assert_eq!(log.sink_count(), 2);
    }

    #[test]
    fn headless_log_skips_broadcast() {
        assert_eq!(ActivityLog::headless(None).sink_count(), 1);

        let delivery = PushDelivery::new("https://logs.example.com/ingest")
            .unwrap()
            .unwrap();
        assert_eq!(ActivityLog::headless(Some(delivery)).sink_count(), 2);
    }

    #[test]
    fn push_sink_outside_runtime_is_a_noop() {
        let delivery = PushDelivery::new("https://logs.example.com/ingest")
            .unwrap()
            .unwrap();
        let log = ActivityLog::builder()
            .with_sink(PushSink::new(delivery))
            .build();

        // No Tokio runtime here; must neither panic nor block.
        log.info("dropped quietly");
    }
}
