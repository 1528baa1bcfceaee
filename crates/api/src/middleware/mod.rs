//! Request-level middleware.
//!
//! - [`request_log::log_request`] -- Writes one activity line per request.

pub mod request_log;
