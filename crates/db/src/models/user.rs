//! Demo user rows (one admin plus staff per company).

use chrono::NaiveDate;
use lagar_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// The columns returned after inserting users.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRef {
    pub id: DbId,
    pub company_id: DbId,
    pub role: String,
    pub email: String,
}

/// Insert DTO for a demo user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub company_id: DbId,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub first_name: String,
    pub last_name: String,
    pub onboarding_completed: bool,
    pub base_salary: Option<f64>,
    pub hourly_rate: Option<f64>,
    pub daily_rate: Option<f64>,
    pub salary_type: String,
    pub working_days: i32,
    pub pf_esi_applicable: bool,
    pub joining_date: NaiveDate,
}
