//! Background job rows: one row per seed run in queued mode.

use lagar_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{JobStatus, StatusId};

/// A row from the `background_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BackgroundJob {
    pub id: DbId,
    pub job_type: String,
    pub status_id: StatusId,
    pub progress: i32,
    pub total: Option<i32>,
    pub error_message: Option<String>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl BackgroundJob {
    /// Typed status, `None` if the lookup table holds an id this build does not know.
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }

    /// Whether this job currently holds the single-flight slot for its kind.
    pub fn is_active(&self) -> bool {
        self.status().is_some_and(JobStatus::is_active)
    }

    /// When the run began: the claim time once running, creation time before.
    pub fn effective_started_at(&self) -> Timestamp {
        self.started_at.unwrap_or(self.created_at)
    }
}

/// Query parameters for `GET /seed-jobs`.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    /// Maximum number of results. Defaults to 20, capped at 100.
    pub limit: Option<i64>,
}
