//! Shared response envelope types for API handlers.
//!
//! Listing and lookup endpoints use a `{ "data": ... }` envelope. The seed
//! trigger and status endpoints keep their flat shapes because the log viewer
//! page reads them directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: jobs }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
