//! Repository for the `companies` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::INSERT_BATCH_SIZE;
use crate::models::company::{Company, NewCompany};

pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert companies in batches, returning the created rows in input order.
    pub async fn insert_many(
        pool: &PgPool,
        companies: &[NewCompany],
    ) -> Result<Vec<Company>, sqlx::Error> {
        let mut created = Vec::with_capacity(companies.len());

        for chunk in companies.chunks(INSERT_BATCH_SIZE) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO companies (\
                 name, description, industry, size, status, \
                 shift_start_time, shift_end_time, grace_period_minutes, \
                 location_lat, location_lng, location_radius, default_salary_type, \
                 overtime_multiplier, late_penalty_per_minute, absent_penalty_per_day, \
                 pf_percentage, esi_percentage) ",
            );
            qb.push_values(chunk, |mut row, c| {
                row.push_bind(c.name.clone())
                    .push_bind(c.description.clone())
                    .push_bind(c.industry.clone())
                    .push_bind(c.size.clone())
                    .push_bind(c.status.clone())
                    .push_bind(c.shift_start_time.clone())
                    .push_bind(c.shift_end_time.clone())
                    .push_bind(c.grace_period_minutes)
                    .push_bind(c.location_lat)
                    .push_bind(c.location_lng)
                    .push_bind(c.location_radius)
                    .push_bind(c.default_salary_type.clone())
                    .push_bind(c.overtime_multiplier)
                    .push_bind(c.late_penalty_per_minute)
                    .push_bind(c.absent_penalty_per_day)
                    .push_bind(c.pf_percentage)
                    .push_bind(c.esi_percentage);
            });
            qb.push(" RETURNING id, name, created_at");

            let mut rows = qb.build_query_as::<Company>().fetch_all(pool).await?;
            // RETURNING order is not guaranteed; restore insertion order by id.
            rows.sort_by_key(|c| c.id);
            created.extend(rows);
        }

        tracing::debug!(count = created.len(), "Inserted companies");
        Ok(created)
    }

    /// Delete every company. Users and attendance must be removed first.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
