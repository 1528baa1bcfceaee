//! Shared fakes for pipeline integration tests.
//!
//! [`MemoryJobStore`] mirrors the semantics of the `background_jobs` table:
//! at most one active job per kind, conditional terminal transitions, and
//! newest-first listings. [`FakeGenerator`] narrates two progress steps and
//! can be told to wait, fail or panic.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use lagar_core::jobs::PROGRESS_COMPLETE;
use lagar_core::types::{DbId, Timestamp};
use lagar_db::models::background_job::BackgroundJob;
use lagar_db::models::status::JobStatus;
use lagar_db::repositories::background_job_repo::clamp_limit;
use lagar_events::{ActivityLog, EventBroadcaster};
use lagar_pipeline::{
    ContentGenerator, GeneratorError, JobController, JobStore, ProgressSink,
};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// MemoryJobStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<Vec<BackgroundJob>>,
    claims: AtomicUsize,
    progress_updates: AtomicUsize,
}

impl MemoryJobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of claim attempts, successful or not.
    pub fn claim_attempts(&self) -> usize {
        self.claims.load(Ordering::SeqCst)
    }

    pub fn progress_updates(&self) -> usize {
        self.progress_updates.load(Ordering::SeqCst)
    }

    pub fn job(&self, id: DbId) -> BackgroundJob {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .expect("job should exist")
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Pretend the job was claimed at `started_at`.
    pub fn backdate_start(&self, id: DbId, started_at: Timestamp) {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.iter_mut().find(|j| j.id == id).unwrap();
        job.started_at = Some(started_at);
    }

    fn with_job<T>(&self, id: DbId, f: impl FnOnce(&mut BackgroundJob) -> T) -> Option<T> {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.iter_mut().find(|j| j.id == id).map(f)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create_pending(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs.iter().any(|j| j.job_type == job_type && j.is_active()) {
            return Ok(None);
        }
        let now = Utc::now();
        let job = BackgroundJob {
            id: jobs.len() as DbId + 1,
            job_type: job_type.to_string(),
            status_id: JobStatus::Pending.id(),
            progress: 0,
            total: None,
            error_message: None,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        };
        jobs.push(job.clone());
        Ok(Some(job))
    }

    async fn find_active(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter()
            .rev()
            .find(|j| j.job_type == job_type && j.is_active())
            .cloned())
    }

    async fn claim_next_pending(
        &self,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        self.claims.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs
            .iter_mut()
            .find(|j| j.job_type == job_type && j.status() == Some(JobStatus::Pending))
        else {
            return Ok(None);
        };
        job.status_id = JobStatus::Running.id();
        job.started_at = Some(Utc::now());
        Ok(Some(job.clone()))
    }

    async fn update_progress(
        &self,
        job_id: DbId,
        progress: i32,
        total: i32,
    ) -> Result<(), sqlx::Error> {
        self.progress_updates.fetch_add(1, Ordering::SeqCst);
        self.with_job(job_id, |job| {
            job.progress = progress;
            job.total = Some(total);
        });
        Ok(())
    }

    async fn complete(&self, job_id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self
            .with_job(job_id, |job| {
                if !job.is_active() {
                    return false;
                }
                job.status_id = JobStatus::Done.id();
                job.progress = PROGRESS_COMPLETE;
                job.finished_at = Some(Utc::now());
                true
            })
            .unwrap_or(false))
    }

    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        Ok(self
            .with_job(job_id, |job| {
                if !job.is_active() {
                    return false;
                }
                job.status_id = JobStatus::Failed.id();
                job.error_message = Some(error.to_string());
                job.finished_at = Some(Utc::now());
                true
            })
            .unwrap_or(false))
    }

    async fn fail_stale(
        &self,
        job_type: &str,
        cutoff: Timestamp,
        error: &str,
    ) -> Result<u64, sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        let mut reclaimed = 0;
        for job in jobs.iter_mut().filter(|j| {
            j.job_type == job_type
                && j.status() == Some(JobStatus::Running)
                && j.started_at.is_some_and(|t| t < cutoff)
        }) {
            job.status_id = JobStatus::Failed.id();
            job.error_message = Some(error.to_string());
            job.finished_at = Some(Utc::now());
            reclaimed += 1;
        }
        Ok(reclaimed)
    }

    async fn latest(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().rev().find(|j| j.job_type == job_type).cloned())
    }

    async fn list_recent(
        &self,
        job_type: &str,
        limit: Option<i64>,
    ) -> Result<Vec<BackgroundJob>, sqlx::Error> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter()
            .rev()
            .filter(|j| j.job_type == job_type)
            .take(clamp_limit(limit) as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().find(|j| j.id == id).cloned())
    }
}

// ---------------------------------------------------------------------------
// FakeGenerator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeGenerator {
    calls: AtomicUsize,
    release: Option<Arc<Notify>>,
    failure: Option<String>,
    panics: bool,
}

impl FakeGenerator {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn panicking() -> Arc<Self> {
        Arc::new(Self {
            panics: true,
            ..Self::default()
        })
    }

    /// Succeeds, but only after `release` is notified.
    pub fn gated(release: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            release: Some(release),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn generate(&self, progress: &ProgressSink) -> Result<(), GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        progress.report(1, 2, "step one").await;

        if let Some(release) = &self.release {
            release.notified().await;
        }
        if self.panics {
            panic!("generator exploded");
        }

        progress.report(2, 2, "step two").await;
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn broadcast_log() -> (Arc<EventBroadcaster>, ActivityLog) {
    let broadcaster = Arc::new(EventBroadcaster::new());
    let log = ActivityLog::standard(Arc::clone(&broadcaster), None);
    (broadcaster, log)
}

/// Wait until the controller reports no active run.
pub async fn wait_until_idle(controller: &JobController) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if !controller.status().await.unwrap().running {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("run should finish within 5 seconds");
}
