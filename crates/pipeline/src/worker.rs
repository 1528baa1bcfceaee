//! Polling executor for queued seed jobs.
//!
//! [`SeedWorker`] claims the oldest PENDING job with an atomic
//! `FOR UPDATE SKIP LOCKED` update, runs the generator against a
//! [`ProgressSink`] bound to that job, and records DONE or FAILED. When no
//! job is pending it sleeps for the poll interval. A run is never
//! interrupted: cancellation is only observed between polls.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lagar_core::jobs::{DEFAULT_POLL_INTERVAL, JOB_KIND_LAGAR_SEED};
use lagar_core::types::DbId;
use lagar_events::ActivityLog;
use tokio_util::sync::CancellationToken;

use crate::generator::ContentGenerator;
use crate::progress::ProgressSink;
use crate::store::JobStore;

/// Error text recorded on jobs reclaimed by the staleness check.
pub const STALE_JOB_ERROR: &str = "Worker stopped responding; job reclaimed as stale";

/// What a single poll did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No PENDING job was available.
    Idle,
    /// A job was claimed and finished successfully.
    Completed(DbId),
    /// A job was claimed and its generator failed.
    Failed(DbId),
}

pub struct SeedWorker {
    store: Arc<dyn JobStore>,
    generator: Arc<dyn ContentGenerator>,
    log: ActivityLog,
    poll_interval: Duration,
    stale_after: Option<Duration>,
}

impl SeedWorker {
    /// Create a worker with the default 5-second poll interval and stale
    /// reclaim disabled.
    pub fn new(
        store: Arc<dyn JobStore>,
        generator: Arc<dyn ContentGenerator>,
        log: ActivityLog,
    ) -> Self {
        Self {
            store,
            generator,
            log,
            poll_interval: DEFAULT_POLL_INTERVAL,
            stale_after: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fail RUNNING jobs claimed longer than `stale_after` ago before each
    /// poll. `None` leaves crashed jobs RUNNING.
    pub fn with_stale_after(mut self, stale_after: Option<Duration>) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run the poll loop until the cancellation token is triggered.
    ///
    /// After a job finishes the next poll happens immediately; after an idle
    /// poll or a store error the loop sleeps for the poll interval.
    pub async fn run(&self, cancel: CancellationToken) {
        self.log.info("Worker started");
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            stale_after_secs = self.stale_after.map(|d| d.as_secs()),
            "Seed worker started",
        );

        while !cancel.is_cancelled() {
            match self.poll_once().await {
                Ok(PollOutcome::Idle) => {}
                Ok(PollOutcome::Completed(_) | PollOutcome::Failed(_)) => continue,
                Err(e) => tracing::error!(error = %e, "Seed worker poll failed"),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::info!("Seed worker shutting down");
    }

    /// One iteration: optional stale reclaim, claim, execute, record.
    ///
    /// Errors are returned only for claim and reclaim queries; failures to
    /// record the final status are logged and the outcome is still reported.
    pub async fn poll_once(&self) -> Result<PollOutcome, sqlx::Error> {
        self.reclaim_stale().await?;

        let Some(job) = self.store.claim_next_pending(JOB_KIND_LAGAR_SEED).await? else {
            return Ok(PollOutcome::Idle);
        };
        let job_id = job.id;

        tracing::info!(job_id, "Seed job claimed");
        self.log.info(format!("Running job {job_id}"));

        let sink = ProgressSink::for_job(Arc::clone(&self.store), job_id, self.log.clone());
        let generator = Arc::clone(&self.generator);

        // A panicking generator must not take the loop down with it.
        let result = tokio::spawn(async move { generator.generate(&sink).await })
            .await
            .map_err(|e| format!("seed task aborted: {e}"))
            .and_then(|r| r.map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                match self.store.complete(job_id).await {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!(job_id, "Seed job was already terminal"),
                    Err(e) => {
                        tracing::error!(job_id, error = %e, "Failed to mark seed job done")
                    }
                }
                self.log.info(format!("Job {job_id} completed"));
                Ok(PollOutcome::Completed(job_id))
            }
            Err(message) => {
                match self.store.fail(job_id, &message).await {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!(job_id, "Seed job was already terminal"),
                    Err(e) => {
                        tracing::error!(job_id, error = %e, "Failed to mark seed job failed")
                    }
                }
                self.log.error(format!("Job {job_id} failed: {message}"));
                Ok(PollOutcome::Failed(job_id))
            }
        }
    }

    async fn reclaim_stale(&self) -> Result<(), sqlx::Error> {
        let Some(stale_after) = self.stale_after else {
            return Ok(());
        };
        let Ok(age) = chrono::Duration::from_std(stale_after) else {
            return Ok(());
        };

        let cutoff = Utc::now() - age;
        let reclaimed = self
            .store
            .fail_stale(JOB_KIND_LAGAR_SEED, cutoff, STALE_JOB_ERROR)
            .await?;
        if reclaimed > 0 {
            self.log
                .error(format!("Reclaimed {reclaimed} stale seed job(s)"));
        }
        Ok(())
    }
}
