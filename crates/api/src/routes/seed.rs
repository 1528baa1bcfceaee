//! Route definitions for seed runs.

use axum::routing::get;
use axum::Router;

use crate::handlers::seed;
use crate::state::AppState;

/// ```text
/// GET, POST  /start-seed        -> start_seed
/// GET, POST  /push-in-db        -> start_seed
/// GET        /seed-status       -> seed_status
/// GET        /seed-jobs         -> list_jobs
/// GET        /seed-jobs/{id}    -> get_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-seed", get(seed::start_seed).post(seed::start_seed))
        .route("/push-in-db", get(seed::start_seed).post(seed::start_seed))
        .route("/seed-status", get(seed::seed_status))
        .route("/seed-jobs", get(seed::list_jobs))
        .route("/seed-jobs/{id}", get(seed::get_job))
}
