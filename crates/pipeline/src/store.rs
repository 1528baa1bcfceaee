//! Persistence seam for seed jobs.
//!
//! [`JobStore`] is the subset of job-row operations the controller, the
//! progress sink and the worker need. [`PgJobStore`] is the production
//! implementation over [`BackgroundJobRepo`]; tests substitute an in-memory
//! store so the lifecycle can be exercised without PostgreSQL.

use async_trait::async_trait;
use lagar_core::types::{DbId, Timestamp};
use lagar_db::models::background_job::BackgroundJob;
use lagar_db::repositories::BackgroundJobRepo;
use lagar_db::DbPool;

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a PENDING job unless one of this kind is already active.
    async fn create_pending(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error>;

    async fn find_active(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error>;

    /// Atomically move the oldest PENDING job to RUNNING and return it.
    async fn claim_next_pending(
        &self,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error>;

    async fn update_progress(
        &self,
        job_id: DbId,
        progress: i32,
        total: i32,
    ) -> Result<(), sqlx::Error>;

    /// Returns `false` if the job was already terminal.
    async fn complete(&self, job_id: DbId) -> Result<bool, sqlx::Error>;

    /// Returns `false` if the job was already terminal.
    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, sqlx::Error>;

    async fn fail_stale(
        &self,
        job_type: &str,
        cutoff: Timestamp,
        error: &str,
    ) -> Result<u64, sqlx::Error>;

    async fn latest(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error>;

    async fn list_recent(
        &self,
        job_type: &str,
        limit: Option<i64>,
    ) -> Result<Vec<BackgroundJob>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<BackgroundJob>, sqlx::Error>;
}

/// [`JobStore`] backed by the `background_jobs` table.
#[derive(Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create_pending(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::create_pending(&self.pool, job_type).await
    }

    async fn find_active(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::find_active(&self.pool, job_type).await
    }

    async fn claim_next_pending(
        &self,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::claim_next_pending(&self.pool, job_type).await
    }

    async fn update_progress(
        &self,
        job_id: DbId,
        progress: i32,
        total: i32,
    ) -> Result<(), sqlx::Error> {
        BackgroundJobRepo::update_progress(&self.pool, job_id, progress, total).await
    }

    async fn complete(&self, job_id: DbId) -> Result<bool, sqlx::Error> {
        BackgroundJobRepo::complete(&self.pool, job_id).await
    }

    async fn fail(&self, job_id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        BackgroundJobRepo::fail(&self.pool, job_id, error).await
    }

    async fn fail_stale(
        &self,
        job_type: &str,
        cutoff: Timestamp,
        error: &str,
    ) -> Result<u64, sqlx::Error> {
        BackgroundJobRepo::fail_stale(&self.pool, job_type, cutoff, error).await
    }

    async fn latest(&self, job_type: &str) -> Result<Option<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::latest(&self.pool, job_type).await
    }

    async fn list_recent(
        &self,
        job_type: &str,
        limit: Option<i64>,
    ) -> Result<Vec<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::list_recent(&self.pool, job_type, limit).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<BackgroundJob>, sqlx::Error> {
        BackgroundJobRepo::find_by_id(&self.pool, id).await
    }
}
