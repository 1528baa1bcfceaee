//! Progress reporting handed to a running generator.
//!
//! A [`ProgressSink`] is bound to exactly one run: either a persisted job row
//! (queued mode) or the in-memory progress cell of an inline run. Every
//! `report` forwards its message to the [`ActivityLog`], so observers see one
//! live line per report. Reporting never fails from the caller's point of
//! view; persistence errors are logged and swallowed.

use std::sync::{Arc, Mutex, PoisonError};

use lagar_core::jobs::progress_anomaly;
use lagar_core::types::DbId;
use lagar_events::ActivityLog;

use crate::store::JobStore;

/// Last reported position of an inline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunProgress {
    pub progress: i32,
    pub total: Option<i32>,
}

#[derive(Clone)]
enum ProgressTarget {
    Job {
        store: Arc<dyn JobStore>,
        job_id: DbId,
    },
    Memory(Arc<Mutex<RunProgress>>),
}

#[derive(Clone)]
pub struct ProgressSink {
    target: ProgressTarget,
    log: ActivityLog,
}

impl ProgressSink {
    /// A sink that records progress on the persisted job `job_id`.
    pub fn for_job(store: Arc<dyn JobStore>, job_id: DbId, log: ActivityLog) -> Self {
        Self {
            target: ProgressTarget::Job { store, job_id },
            log,
        }
    }

    /// A sink that records progress into a shared in-memory cell.
    pub fn in_memory(cell: Arc<Mutex<RunProgress>>, log: ActivityLog) -> Self {
        Self {
            target: ProgressTarget::Memory(cell),
            log,
        }
    }

    /// The persisted job this sink is bound to, if any.
    pub fn job_id(&self) -> Option<DbId> {
        match &self.target {
            ProgressTarget::Job { job_id, .. } => Some(*job_id),
            ProgressTarget::Memory(_) => None,
        }
    }

    /// Record `current` of `total` and publish `message`.
    ///
    /// Out-of-range values are stored as given and only warned about.
    pub async fn report(&self, current: i32, total: i32, message: impl Into<String>) {
        if let Some(anomaly) = progress_anomaly(current, total) {
            tracing::warn!(job_id = ?self.job_id(), %anomaly, "Unusual progress report");
        }

        match &self.target {
            ProgressTarget::Job { store, job_id } => {
                if let Err(e) = store.update_progress(*job_id, current, total).await {
                    tracing::error!(job_id, error = %e, "Failed to persist job progress");
                }
            }
            ProgressTarget::Memory(cell) => {
                let mut cell = cell.lock().unwrap_or_else(PoisonError::into_inner);
                cell.progress = current;
                cell.total = Some(total);
            }
        }

        self.log.info(message);
    }

    /// Publish a narration line without touching progress.
    pub fn log(&self, message: impl Into<String>) {
        self.log.info(message);
    }

    /// Publish an error line without touching progress.
    pub fn error(&self, message: impl Into<String>) {
        self.log.error(message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use lagar_core::types::Timestamp;
    use lagar_db::models::background_job::BackgroundJob;
    use lagar_events::EventBroadcaster;

    use super::*;

    /// Store whose every write fails.
    struct BrokenStore;

    #[async_trait]
    impl JobStore for BrokenStore {
        async fn create_pending(&self, _: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn find_active(&self, _: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn claim_next_pending(
            &self,
            _: &str,
        ) -> Result<Option<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn update_progress(&self, _: DbId, _: i32, _: i32) -> Result<(), sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn complete(&self, _: DbId) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn fail(&self, _: DbId, _: &str) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn fail_stale(&self, _: &str, _: Timestamp, _: &str) -> Result<u64, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn latest(&self, _: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn list_recent(
            &self,
            _: &str,
            _: Option<i64>,
        ) -> Result<Vec<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
        async fn find_by_id(&self, _: DbId) -> Result<Option<BackgroundJob>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    fn broadcast_log() -> (Arc<EventBroadcaster>, ActivityLog) {
        let broadcaster = Arc::new(EventBroadcaster::new());
        let log = ActivityLog::standard(Arc::clone(&broadcaster), None);
        (broadcaster, log)
    }

    #[tokio::test]
    async fn memory_report_updates_cell_and_broadcasts() {
        let (broadcaster, log) = broadcast_log();
        let mut sub = broadcaster.subscribe();
        let cell = Arc::new(Mutex::new(RunProgress::default()));
        let sink = ProgressSink::in_memory(Arc::clone(&cell), log);

        sink.report(3, 10, "Creating users").await;

        assert_eq!(
            *cell.lock().unwrap(),
            RunProgress {
                progress: 3,
                total: Some(10)
            }
        );
        assert_eq!(sub.try_recv().unwrap().message, "Creating users");
        assert!(sub.try_recv().is_none(), "exactly one line per report");
    }

    #[tokio::test]
    async fn decreasing_and_out_of_range_progress_is_stored() {
        let (_broadcaster, log) = broadcast_log();
        let cell = Arc::new(Mutex::new(RunProgress::default()));
        let sink = ProgressSink::in_memory(Arc::clone(&cell), log);

        sink.report(50, 100, "halfway").await;
        sink.report(20, 100, "rewound").await;
        assert_eq!(cell.lock().unwrap().progress, 20);

        sink.report(150, 100, "overshoot").await;
        assert_eq!(cell.lock().unwrap().progress, 150);
    }

    #[tokio::test]
    async fn store_failure_still_broadcasts() {
        let (broadcaster, log) = broadcast_log();
        let mut sub = broadcaster.subscribe();
        let sink = ProgressSink::for_job(Arc::new(BrokenStore), 7, log);

        sink.report(1, 2, "still visible").await;

        assert_eq!(sink.job_id(), Some(7));
        assert_eq!(sub.try_recv().unwrap().message, "still visible");
    }

    #[tokio::test]
    async fn error_lines_are_prefixed() {
        let (broadcaster, log) = broadcast_log();
        let mut sub = broadcaster.subscribe();
        let sink = ProgressSink::in_memory(Arc::default(), log);

        sink.log("narration");
        sink.error("bad row");

        assert_eq!(sub.try_recv().unwrap().message, "narration");
        assert_eq!(sub.try_recv().unwrap().message, "ERROR: bad row");
    }
}
