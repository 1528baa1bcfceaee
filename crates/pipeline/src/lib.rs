//! Seed job orchestration: admission, progress reporting and execution.
//!
//! The HTTP server owns a [`JobController`]; in queued mode the worker binary
//! owns a [`SeedWorker`]. Both drive a [`ContentGenerator`] through a
//! [`ProgressSink`] and persist through a [`JobStore`].

pub mod controller;
pub mod error;
pub mod generator;
pub mod progress;
pub mod store;
pub mod worker;

pub use controller::{JobController, RunInfo, StartOutcome, StatusSnapshot};
pub use error::ControllerError;
pub use generator::{ContentGenerator, GeneratorError};
pub use progress::{ProgressSink, RunProgress};
pub use store::{JobStore, PgJobStore};
pub use worker::{PollOutcome, SeedWorker};
