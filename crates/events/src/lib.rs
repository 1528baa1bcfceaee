//! Live progress infrastructure for the Lagar demo seeder.
//!
//! - [`EventBroadcaster`]: in-process fan-out to currently connected
//!   observers, one unbounded channel per subscriber.
//! - [`ActivityLog`]: the explicit operational log; each line goes to the
//!   process log, the broadcaster, and optionally an external collector.
//! - [`delivery`]: outbound HTTP push of log lines.

pub mod activity;
pub mod broadcaster;
pub mod delivery;

pub use activity::{ActivityLog, LogEntry, LogLevel, LogSink};
pub use broadcaster::{EventBroadcaster, ProgressEvent, Subscription, SubscriptionHandle};
pub use delivery::push::{PushDelivery, PushError};
