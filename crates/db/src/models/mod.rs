//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` row struct and, where
//! rows are inserted, a `New*` DTO carrying the insert columns.

pub mod attendance;
pub mod background_job;
pub mod company;
pub mod status;
pub mod user;
