pub mod health;
pub mod pages;
pub mod seed;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Routes that answer promptly and run under the request timeout.
///
/// ```text
/// /                    landing text
/// /logs                log viewer page
/// /health              service health
/// /start-seed          trigger a run (GET, POST)
/// /push-in-db          alias of /start-seed
/// /seed-status         current or last run
/// /seed-jobs           persisted job history
/// /seed-jobs/{id}      one persisted job
/// ```
pub fn timed_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(pages::router())
        .merge(seed::router())
}

/// Long-lived routes that must never hit the request timeout.
///
/// ```text
/// /events              SSE progress stream
/// ```
pub fn stream_routes() -> Router<AppState> {
    Router::new().route("/events", get(handlers::events::stream_events))
}
