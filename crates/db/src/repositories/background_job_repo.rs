//! Repository for the `background_jobs` table.
//!
//! Uses `JobStatus` from `models::status` for every status literal. All
//! terminal transitions are conditional on the job still being active, so a
//! job reaches DONE or FAILED at most once.

use lagar_core::jobs::PROGRESS_COMPLETE;
use lagar_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::background_job::BackgroundJob;
use crate::models::status::JobStatus;

/// Column list for `background_jobs` queries.
const COLUMNS: &str = "\
    id, job_type, status_id, progress, total, error_message, \
    started_at, finished_at, created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 20;

/// Provides lifecycle operations for seed jobs.
pub struct BackgroundJobRepo;

impl BackgroundJobRepo {
    /// Insert a new PENDING job unless one of this kind is already active.
    ///
    /// Relies on the partial unique index `uq_background_jobs_active_kind`;
    /// returns `None` when the index rejected the row.
    pub async fn create_pending(
        pool: &PgPool,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let query = format!(
            "INSERT INTO background_jobs (job_type, status_id) \
             VALUES ($1, $2) \
             ON CONFLICT (job_type) WHERE status_id IN (1, 2) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(job_type)
            .bind(JobStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// The active (PENDING or RUNNING) job of a kind, if any.
    pub async fn find_active(
        pool: &PgPool,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM background_jobs \
             WHERE job_type = $1 AND status_id IN ($2, $3) \
             ORDER BY created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(job_type)
            .bind(JobStatus::Pending.id())
            .bind(JobStatus::Running.id())
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the oldest PENDING job of a kind and mark it RUNNING.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so two pollers never claim the
    /// same row.
    pub async fn claim_next_pending(
        pool: &PgPool,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let query = format!(
            "UPDATE background_jobs \
             SET status_id = $2, started_at = NOW(), updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM background_jobs \
                 WHERE job_type = $1 AND status_id = $3 \
                 ORDER BY created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(job_type)
            .bind(JobStatus::Running.id())
            .bind(JobStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Record progress for a job. Values are stored as reported.
    pub async fn update_progress(
        pool: &PgPool,
        job_id: DbId,
        progress: i32,
        total: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE background_jobs \
             SET progress = $2, total = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(progress)
        .bind(total)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark an active job DONE with full progress.
    ///
    /// Returns `false` if the job was already terminal.
    pub async fn complete(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE background_jobs \
             SET status_id = $2, progress = $3, finished_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($4, $5)",
        )
        .bind(job_id)
        .bind(JobStatus::Done.id())
        .bind(PROGRESS_COMPLETE)
        .bind(JobStatus::Pending.id())
        .bind(JobStatus::Running.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark an active job FAILED with an error message.
    ///
    /// No automatic retry is performed; an operator triggers a new run.
    /// Returns `false` if the job was already terminal.
    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE background_jobs \
             SET status_id = $2, error_message = $3, finished_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($4, $5)",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .bind(JobStatus::Pending.id())
        .bind(JobStatus::Running.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fail RUNNING jobs of a kind that were claimed before `cutoff`.
    ///
    /// Returns the number of jobs reclaimed.
    pub async fn fail_stale(
        pool: &PgPool,
        job_type: &str,
        cutoff: Timestamp,
        error: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE background_jobs \
             SET status_id = $3, error_message = $4, finished_at = NOW(), updated_at = NOW() \
             WHERE job_type = $1 AND status_id = $5 AND started_at < $2",
        )
        .bind(job_type)
        .bind(cutoff)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .bind(JobStatus::Running.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// The most recently created job of a kind, in any status.
    pub async fn latest(
        pool: &PgPool,
        job_type: &str,
    ) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM background_jobs \
             WHERE job_type = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(job_type)
            .fetch_optional(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BackgroundJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM background_jobs WHERE id = $1");
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the newest jobs of a kind. `limit` defaults to 20, capped at 100.
    pub async fn list_recent(
        pool: &PgPool,
        job_type: &str,
        limit: Option<i64>,
    ) -> Result<Vec<BackgroundJob>, sqlx::Error> {
        let limit = clamp_limit(limit);
        let query = format!(
            "SELECT {COLUMNS} FROM background_jobs \
             WHERE job_type = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, BackgroundJob>(&query)
            .bind(job_type)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

/// Apply the default and cap to a requested page size.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}
