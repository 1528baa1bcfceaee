//! Repository for the `users` table.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::INSERT_BATCH_SIZE;
use crate::models::user::{NewUser, UserRef};

pub struct UserRepo;

impl UserRepo {
    /// Insert users in batches, returning id, company, role and e-mail of each.
    pub async fn insert_many(pool: &PgPool, users: &[NewUser]) -> Result<Vec<UserRef>, sqlx::Error> {
        let mut created = Vec::with_capacity(users.len());

        for chunk in users.chunks(INSERT_BATCH_SIZE) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO users (\
                 company_id, email, phone, password_hash, role, status, \
                 first_name, last_name, onboarding_completed, \
                 base_salary, hourly_rate, daily_rate, salary_type, \
                 working_days, pf_esi_applicable, joining_date) ",
            );
            qb.push_values(chunk, |mut row, u| {
                row.push_bind(u.company_id)
                    .push_bind(u.email.clone())
                    .push_bind(u.phone.clone())
                    .push_bind(u.password_hash.clone())
                    .push_bind(u.role.clone())
                    .push_bind(u.status.clone())
                    .push_bind(u.first_name.clone())
                    .push_bind(u.last_name.clone())
                    .push_bind(u.onboarding_completed)
                    .push_bind(u.base_salary)
                    .push_bind(u.hourly_rate)
                    .push_bind(u.daily_rate)
                    .push_bind(u.salary_type.clone())
                    .push_bind(u.working_days)
                    .push_bind(u.pf_esi_applicable)
                    .push_bind(u.joining_date);
            });
            qb.push(" RETURNING id, company_id, role, email");

            let mut rows = qb.build_query_as::<UserRef>().fetch_all(pool).await?;
            rows.sort_by_key(|u| u.id);
            created.extend(rows);
        }

        tracing::debug!(count = created.len(), "Inserted users");
        Ok(created)
    }

    /// Delete every user. Attendance must be removed first.
    pub async fn delete_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
