//! Handlers for triggering and inspecting seed runs.
//!
//! `/start-seed` returns as soon as the run is admitted; progress arrives on
//! `/events` and through `/seed-status`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lagar_core::jobs::SeedMode;
use lagar_core::types::DbId;
use lagar_db::models::background_job::JobListQuery;
use lagar_pipeline::{RunInfo, StartOutcome};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::response::DataResponse;
use crate::state::AppState;

pub const STARTED_MESSAGE: &str = "Seeding started in background. You may close this page.";
pub const ALREADY_RUNNING_MESSAGE: &str = "Seeding already running";

/// Body of `/start-seed`, for both acceptance and rejection.
///
/// On rejection `run` describes the run that is already active.
#[derive(Debug, Serialize)]
pub struct StartSeedResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub run: RunInfo,
}

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// GET|POST /start-seed (alias /push-in-db)
///
/// Admit a new seed run without waiting for it. Returns 200 when the run was
/// started in this process, 202 when it was queued for the worker, and 409
/// when a run is already active.
pub async fn start_seed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let outcome = state.controller.start().await?;
    let status = start_status(&outcome, state.controller.mode());

    let message = if outcome.accepted {
        STARTED_MESSAGE
    } else {
        tracing::info!(
            job_id = outcome.run.job_id,
            started_at = %outcome.run.started_at,
            "Seed request rejected, run already active",
        );
        ALREADY_RUNNING_MESSAGE
    };

    Ok((
        status,
        Json(StartSeedResponse {
            message,
            run: outcome.run,
        }),
    ))
}

fn start_status(outcome: &StartOutcome, mode: SeedMode) -> StatusCode {
    match (outcome.accepted, mode) {
        (false, _) => StatusCode::CONFLICT,
        (true, SeedMode::Inline) => StatusCode::OK,
        (true, SeedMode::Queued) => StatusCode::ACCEPTED,
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /seed-status
pub async fn seed_status(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(state.controller.status().await?))
}

// ---------------------------------------------------------------------------
// Job history
// ---------------------------------------------------------------------------

/// GET /seed-jobs
///
/// Newest persisted seed jobs. Supports an optional `limit` (default 20,
/// capped at 100). Always empty in inline mode. A non-numeric `limit` is a
/// `BAD_REQUEST`.
pub async fn list_jobs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.controller.recent_jobs(params.limit).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /seed-jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    ApiPath(job_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = state.controller.find_job(job_id).await?;
    Ok(Json(DataResponse { data: job }))
}
