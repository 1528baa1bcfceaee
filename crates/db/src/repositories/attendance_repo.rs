//! Repository for the `attendance` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::INSERT_BATCH_SIZE;
use crate::models::attendance::NewAttendance;

pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Insert one batch of attendance rows (at most [`INSERT_BATCH_SIZE`]
    /// rows per statement). Returns the number of rows written.
    pub async fn insert_batch(pool: &PgPool, rows: &[NewAttendance]) -> Result<u64, sqlx::Error> {
        let mut inserted = 0;

        for chunk in rows.chunks(INSERT_BATCH_SIZE) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO attendance (\
                 user_id, company_id, attendance_date, punch_in, punch_out, \
                 working_hours, status_id, approved_by, approved_at) ",
            );
            qb.push_values(chunk, |mut row, a| {
                row.push_bind(a.user_id)
                    .push_bind(a.company_id)
                    .push_bind(a.attendance_date)
                    .push_bind(a.punch_in)
                    .push_bind(a.punch_out)
                    .push_bind(a.working_hours)
                    .push_bind(a.status.id())
                    .push_bind(a.approved_by)
                    .push_bind(a.approved_at);
            });

            inserted += qb.build().execute(pool).await?.rows_affected();
        }

        Ok(inserted)
    }

    /// Delete every attendance row.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM attendance").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
