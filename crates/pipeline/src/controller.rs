//! Single-flight admission for seed runs.
//!
//! A [`JobController`] accepts at most one active run of the seed job at a
//! time. It has two strategies:
//!
//! - **Inline**: the active run lives in memory and the generator is spawned
//!   on the current Tokio runtime. The check-and-set happens inside one
//!   `std::sync::Mutex` critical section with no `.await`, and a [`RunGuard`]
//!   clears the marker on every exit path, panics included.
//! - **Queued**: admission inserts a PENDING row guarded by a partial unique
//!   index; the seed worker claims and executes it.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use lagar_core::error::CoreError;
use lagar_core::jobs::{SeedMode, JOB_KIND_LAGAR_SEED, PROGRESS_COMPLETE};
use lagar_core::types::{DbId, Timestamp};
use lagar_db::models::background_job::BackgroundJob;
use lagar_db::models::status::JobStatus;
use lagar_events::ActivityLog;
use serde::Serialize;

use crate::error::ControllerError;
use crate::generator::ContentGenerator;
use crate::progress::{ProgressSink, RunProgress};
use crate::store::JobStore;

/// How many times queued admission retries when the active job finished
/// between the rejected insert and the lookup of the blocking job.
const ADMISSION_ATTEMPTS: usize = 3;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Identity of a run, as reported to the caller of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunInfo {
    /// Persisted job id; `None` for inline runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<DbId>,
    pub started_at: Timestamp,
}

/// Result of an admission attempt.
///
/// When `accepted` is false, `run` describes the run that blocked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    pub accepted: bool,
    pub run: RunInfo,
}

impl StartOutcome {
    fn accepted(run: RunInfo) -> Self {
        Self {
            accepted: true,
            run,
        }
    }

    fn rejected(run: RunInfo) -> Self {
        Self {
            accepted: false,
            run,
        }
    }
}

/// Read-only view of the current or most recent run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub running: bool,
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,
}

impl StatusSnapshot {
    fn from_job(job: &BackgroundJob) -> Self {
        let running = job.is_active();
        Self {
            running,
            started_at: if running {
                Some(job.effective_started_at())
            } else {
                job.started_at
            },
            job_id: Some(job.id),
            status: job.status().map(JobStatus::label),
            progress: Some(job.progress),
            total: job.total,
            error: job.error_message.clone(),
            finished_at: job.finished_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Inline run bookkeeping
// ---------------------------------------------------------------------------

struct ActiveRun {
    started_at: Timestamp,
    progress: Arc<Mutex<RunProgress>>,
}

struct FinishedRun {
    started_at: Timestamp,
    finished_at: Timestamp,
    status: JobStatus,
    progress: RunProgress,
    error: Option<String>,
}

#[derive(Default)]
struct InlineState {
    active: Option<ActiveRun>,
    last: Option<FinishedRun>,
}

type SharedState = Arc<Mutex<InlineState>>;

fn lock(state: &SharedState) -> std::sync::MutexGuard<'_, InlineState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the inline active-run marker exactly once.
///
/// `settle` records the generator's result; if the guard is dropped without
/// settling (the task panicked or was aborted) the run is recorded as failed.
struct RunGuard {
    state: SharedState,
    log: ActivityLog,
    settled: bool,
}

impl RunGuard {
    fn settle(mut self, result: Result<(), String>) {
        self.settled = true;
        let failure = result.as_ref().err().map(|e| format!("Seed failed: {e}"));
        // Free the slot first so observers of the final line can start again.
        self.record(result);
        match failure {
            None => self.log.info("Lagar seed completed successfully"),
            Some(line) => self.log.error(line),
        }
    }

    fn record(&self, result: Result<(), String>) {
        let mut state = lock(&self.state);
        let Some(run) = state.active.take() else {
            return;
        };
        let mut progress = *run.progress.lock().unwrap_or_else(PoisonError::into_inner);
        let (status, error) = match result {
            Ok(()) => {
                progress.progress = PROGRESS_COMPLETE;
                (JobStatus::Done, None)
            }
            Err(e) => (JobStatus::Failed, Some(e)),
        };
        state.last = Some(FinishedRun {
            started_at: run.started_at,
            finished_at: Utc::now(),
            status,
            progress,
            error,
        });
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.log.error("Seed run ended unexpectedly");
            self.record(Err("seed run ended unexpectedly".to_string()));
        }
    }
}

// ---------------------------------------------------------------------------
// JobController
// ---------------------------------------------------------------------------

enum Strategy {
    Inline {
        state: SharedState,
        generator: Arc<dyn ContentGenerator>,
    },
    Queued {
        store: Arc<dyn JobStore>,
    },
}

/// Admits, dispatches and reports on seed runs. Share as `Arc<JobController>`.
pub struct JobController {
    strategy: Strategy,
    log: ActivityLog,
}

impl JobController {
    /// Run the generator in this process, tracking the run in memory.
    pub fn inline(generator: Arc<dyn ContentGenerator>, log: ActivityLog) -> Self {
        Self {
            strategy: Strategy::Inline {
                state: SharedState::default(),
                generator,
            },
            log,
        }
    }

    /// Only enqueue PENDING jobs; a seed worker executes them.
    pub fn queued(store: Arc<dyn JobStore>, log: ActivityLog) -> Self {
        Self {
            strategy: Strategy::Queued { store },
            log,
        }
    }

    pub fn mode(&self) -> SeedMode {
        match self.strategy {
            Strategy::Inline { .. } => SeedMode::Inline,
            Strategy::Queued { .. } => SeedMode::Queued,
        }
    }

    /// Try to begin a new run without waiting for its work.
    ///
    /// Must be called from within a Tokio runtime in inline mode.
    pub async fn start(&self) -> Result<StartOutcome, ControllerError> {
        match &self.strategy {
            Strategy::Inline { state, generator } => Ok(self.start_inline(state, generator)),
            Strategy::Queued { store } => self.start_queued(store.as_ref()).await,
        }
    }

    fn start_inline(
        &self,
        state: &SharedState,
        generator: &Arc<dyn ContentGenerator>,
    ) -> StartOutcome {
        let started_at = Utc::now();
        let progress = Arc::new(Mutex::new(RunProgress::default()));

        {
            let mut guard = lock(state);
            if let Some(active) = &guard.active {
                return StartOutcome::rejected(RunInfo {
                    job_id: None,
                    started_at: active.started_at,
                });
            }
            guard.active = Some(ActiveRun {
                started_at,
                progress: Arc::clone(&progress),
            });
        }

        self.log.info("Seed triggered by user");

        let run_guard = RunGuard {
            state: Arc::clone(state),
            log: self.log.clone(),
            settled: false,
        };
        let sink = ProgressSink::in_memory(progress, self.log.clone());
        let generator = Arc::clone(generator);

        tokio::spawn(async move {
            let result = generator.generate(&sink).await;
            run_guard.settle(result.map_err(|e| e.to_string()));
        });

        StartOutcome::accepted(RunInfo {
            job_id: None,
            started_at,
        })
    }

    async fn start_queued(&self, store: &dyn JobStore) -> Result<StartOutcome, ControllerError> {
        for _ in 0..ADMISSION_ATTEMPTS {
            if let Some(job) = store.create_pending(JOB_KIND_LAGAR_SEED).await? {
                self.log
                    .info(format!("Seed triggered by user, job {} queued", job.id));
                return Ok(StartOutcome::accepted(RunInfo {
                    job_id: Some(job.id),
                    started_at: job.created_at,
                }));
            }

            if let Some(active) = store.find_active(JOB_KIND_LAGAR_SEED).await? {
                return Ok(StartOutcome::rejected(RunInfo {
                    job_id: Some(active.id),
                    started_at: active.effective_started_at(),
                }));
            }

            tracing::debug!("Active seed job finished during admission, retrying");
        }

        Err(CoreError::Conflict("Seed job admission kept racing with another run".into()).into())
    }

    /// Snapshot of the active run, or of the most recent one when idle.
    pub async fn status(&self) -> Result<StatusSnapshot, ControllerError> {
        match &self.strategy {
            Strategy::Inline { state, .. } => Ok(inline_status(&lock(state))),
            Strategy::Queued { store } => Ok(store
                .latest(JOB_KIND_LAGAR_SEED)
                .await?
                .map(|job| StatusSnapshot::from_job(&job))
                .unwrap_or_default()),
        }
    }

    /// Newest persisted jobs. Inline runs are not persisted, so the list is
    /// empty in inline mode.
    pub async fn recent_jobs(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<BackgroundJob>, ControllerError> {
        match &self.strategy {
            Strategy::Inline { .. } => Ok(Vec::new()),
            Strategy::Queued { store } => {
                Ok(store.list_recent(JOB_KIND_LAGAR_SEED, limit).await?)
            }
        }
    }

    pub async fn find_job(&self, id: DbId) -> Result<BackgroundJob, ControllerError> {
        let job = match &self.strategy {
            Strategy::Inline { .. } => None,
            Strategy::Queued { store } => store.find_by_id(id).await?,
        };
        job.ok_or_else(|| {
            CoreError::NotFound {
                entity: "BackgroundJob",
                id,
            }
            .into()
        })
    }
}

fn inline_status(state: &InlineState) -> StatusSnapshot {
    if let Some(active) = &state.active {
        let progress = *active.progress.lock().unwrap_or_else(PoisonError::into_inner);
        return StatusSnapshot {
            running: true,
            started_at: Some(active.started_at),
            status: Some(JobStatus::Running.label()),
            progress: Some(progress.progress),
            total: progress.total,
            ..StatusSnapshot::default()
        };
    }

    match &state.last {
        Some(last) => StatusSnapshot {
            running: false,
            started_at: Some(last.started_at),
            job_id: None,
            status: Some(last.status.label()),
            progress: Some(last.progress.progress),
            total: last.progress.total,
            error: last.error.clone(),
            finished_at: Some(last.finished_at),
        },
        None => StatusSnapshot::default(),
    }
}
