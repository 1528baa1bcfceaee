//! Plain-text landing route and the browser log viewer.

use axum::response::Html;

pub const INDEX_TEXT: &str = "Server running. Open /logs to view seeding progress.";

const LOGS_PAGE: &str = include_str!("logs.html");

/// GET /
pub async fn index() -> &'static str {
    INDEX_TEXT
}

/// GET /logs
pub async fn logs_page() -> Html<&'static str> {
    Html(LOGS_PAGE)
}
