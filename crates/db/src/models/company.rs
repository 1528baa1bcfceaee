//! Demo company rows.

use lagar_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `companies` table (identity columns only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// Insert DTO for a demo company.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub size: String,
    pub status: String,
    pub shift_start_time: String,
    pub shift_end_time: String,
    pub grace_period_minutes: i32,
    pub location_lat: f64,
    pub location_lng: f64,
    pub location_radius: f64,
    pub default_salary_type: String,
    pub overtime_multiplier: f64,
    pub late_penalty_per_minute: f64,
    pub absent_penalty_per_day: f64,
    pub pf_percentage: f64,
    pub esi_percentage: f64,
}
