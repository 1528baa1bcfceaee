//! External delivery channels for log lines.
//!
//! Currently a single channel: HTTP push of every log line to a configured
//! collector URL.

pub mod push;
