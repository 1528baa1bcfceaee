use std::sync::Arc;

use lagar_events::{ActivityLog, EventBroadcaster};
use lagar_pipeline::JobController;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lagar_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fan-out to connected `/events` observers.
    pub broadcaster: Arc<EventBroadcaster>,
    /// Operational log; lines reach the process log and every observer.
    pub log: ActivityLog,
    /// Single-flight admission for seed runs.
    pub controller: Arc<JobController>,
    /// Cancelled on SIGINT/SIGTERM; open event streams end so graceful
    /// shutdown can complete.
    pub shutdown: CancellationToken,
}
