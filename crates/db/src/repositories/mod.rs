//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod background_job_repo;
pub mod company_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use background_job_repo::BackgroundJobRepo;
pub use company_repo::CompanyRepo;
pub use user_repo::UserRepo;

/// Rows per multi-row INSERT. Keeps every statement well below the
/// PostgreSQL limit of 65535 bind parameters.
pub const INSERT_BATCH_SIZE: usize = 1000;
