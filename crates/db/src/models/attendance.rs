//! Daily attendance rows for demo staff.

use chrono::NaiveDate;
use lagar_core::types::{DbId, Timestamp};

use super::status::AttendanceStatus;

/// Insert DTO for one attendance day.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub user_id: DbId,
    pub company_id: DbId,
    pub attendance_date: NaiveDate,
    pub punch_in: Option<Timestamp>,
    pub punch_out: Option<Timestamp>,
    pub working_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
}
