//! The Lagar demo-data generator.

use async_trait::async_trait;
use chrono::Utc;
use lagar_core::demo::ROLE_STAFF;
use lagar_core::jobs::PROGRESS_COMPLETE;
use lagar_db::models::company::Company;
use lagar_db::models::user::UserRef;
use lagar_db::repositories::{AttendanceRepo, CompanyRepo, UserRepo};
use lagar_db::DbPool;
use lagar_pipeline::{ContentGenerator, GeneratorError, ProgressSink};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SeedConfig;
use crate::error::SeedError;
use crate::fixtures::{ADMIN_PASSWORD, ATTENDANCE_DAYS, STAFF_PASSWORD};
use crate::password::hash_demo_passwords;
use crate::plan::{
    admins_by_company, attendance_window_start, plan_attendance, plan_companies,
    plan_company_users,
};

/// Staff members whose attendance is planned and inserted together.
const ATTENDANCE_USERS_PER_BATCH: usize = 50;

// Progress checkpoints, in percent.
const PROGRESS_COMPANIES: i32 = 5;
const PROGRESS_USERS: i32 = 10;
const PROGRESS_ATTENDANCE: i32 = 30;

/// Row counts written by one seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub companies: usize,
    pub users: usize,
    pub attendance: u64,
}

pub struct LagarSeeder {
    pool: DbPool,
    config: SeedConfig,
}

impl LagarSeeder {
    pub fn new(pool: DbPool, config: SeedConfig) -> Self {
        Self { pool, config }
    }

    /// Populate companies, users and six months of attendance.
    pub async fn seed(&self, progress: &ProgressSink) -> Result<SeedSummary, SeedError> {
        if self.config.clear_before_seeding {
            self.clear_existing(progress).await?;
        }
        progress.report(0, PROGRESS_COMPLETE, "Seeding Lagar Data...").await;

        let mut rng = StdRng::from_os_rng();
        let today = Utc::now().date_naive();

        // --- Companies ---
        progress
            .report(
                PROGRESS_COMPANIES,
                PROGRESS_COMPLETE,
                "Creating Additional Companies for Lagar Data...",
            )
            .await;
        let companies = CompanyRepo::insert_many(&self.pool, &plan_companies(&mut rng)).await?;
        progress
            .report(
                PROGRESS_USERS,
                PROGRESS_COMPLETE,
                format!("Created {} Lagar companies", companies.len()),
            )
            .await;

        // --- Users ---
        let users = self.seed_users(&companies, progress, &mut rng, today).await?;
        progress
            .report(
                PROGRESS_ATTENDANCE,
                PROGRESS_COMPLETE,
                format!("Created {} Lagar users", users.len()),
            )
            .await;

        // --- Attendance ---
        let attendance = self.seed_attendance(&users, progress, &mut rng, today).await?;

        let summary = SeedSummary {
            companies: companies.len(),
            users: users.len(),
            attendance,
        };
        progress
            .report(
                PROGRESS_COMPLETE,
                PROGRESS_COMPLETE,
                "LAGAR DATA SEED COMPLETED SUCCESSFULLY!",
            )
            .await;
        log_summary(progress, &summary, &companies);
        tracing::info!(?summary, "Lagar seed finished");

        Ok(summary)
    }

    async fn clear_existing(&self, progress: &ProgressSink) -> Result<(), SeedError> {
        progress.log("Clearing existing data...");
        let attendance = AttendanceRepo::delete_all(&self.pool).await?;
        let users = UserRepo::delete_all(&self.pool).await?;
        let companies = CompanyRepo::delete_all(&self.pool).await?;
        tracing::info!(attendance, users, companies, "Deleted existing demo rows");
        progress.log("Existing data cleared.");
        Ok(())
    }

    async fn seed_users(
        &self,
        companies: &[Company],
        progress: &ProgressSink,
        rng: &mut StdRng,
        today: chrono::NaiveDate,
    ) -> Result<Vec<UserRef>, SeedError> {
        progress
            .report(
                PROGRESS_USERS,
                PROGRESS_COMPLETE,
                "Creating Users for Lagar Companies...",
            )
            .await;
        let passwords = hash_demo_passwords().await?;

        let mut planned = Vec::new();
        for (index, company) in companies.iter().enumerate() {
            progress.log(format!(
                "Preparing users for company {}/{}: {}",
                index + 1,
                companies.len(),
                company.name
            ));
            let users = plan_company_users(index, company, &passwords, today, rng);
            progress.log(format!(
                "Preparing {} staff members for {}",
                users.len() - 1,
                company.name
            ));
            planned.extend(users);
        }

        Ok(UserRepo::insert_many(&self.pool, &planned).await?)
    }

    async fn seed_attendance(
        &self,
        users: &[UserRef],
        progress: &ProgressSink,
        rng: &mut StdRng,
        today: chrono::NaiveDate,
    ) -> Result<u64, SeedError> {
        progress
            .report(
                PROGRESS_ATTENDANCE,
                PROGRESS_COMPLETE,
                "Creating Attendance Data for Lagar Users...",
            )
            .await;

        let admins = admins_by_company(users);
        let staff: Vec<&UserRef> = users.iter().filter(|u| u.role == ROLE_STAFF).collect();
        let window_start = attendance_window_start(today);
        progress.log(format!(
            "Preparing attendance for {} staff members over {ATTENDANCE_DAYS} days each",
            staff.len()
        ));

        let mut inserted = 0;
        let mut done = 0;
        for batch in staff.chunks(ATTENDANCE_USERS_PER_BATCH) {
            let rows: Vec<_> = batch
                .iter()
                .flat_map(|user| {
                    let approver = admins.get(&user.company_id).copied();
                    plan_attendance(user, approver, window_start, &mut *rng)
                })
                .collect();
            inserted += AttendanceRepo::insert_batch(&self.pool, &rows).await?;
            done += batch.len();

            progress
                .report(
                    attendance_progress(done, staff.len()),
                    PROGRESS_COMPLETE,
                    format!("Inserted attendance for {done}/{} staff members", staff.len()),
                )
                .await;
        }

        progress.log(format!("Created {inserted} Lagar attendance records"));
        Ok(inserted)
    }
}

#[async_trait]
impl ContentGenerator for LagarSeeder {
    async fn generate(&self, progress: &ProgressSink) -> Result<(), GeneratorError> {
        self.seed(progress).await?;
        Ok(())
    }
}

/// Map attendance batches onto the 30..95 percent band.
fn attendance_progress(done: usize, total: usize) -> i32 {
    const BAND_END: i32 = 95;
    if total == 0 {
        return BAND_END;
    }
    let span = (BAND_END - PROGRESS_ATTENDANCE) as usize;
    PROGRESS_ATTENDANCE + (span * done.min(total) / total) as i32
}

fn log_summary(progress: &ProgressSink, summary: &SeedSummary, companies: &[Company]) {
    progress.log("LAGAR DATA SUMMARY:");
    progress.log(format!("  - {} Lagar Companies", summary.companies));
    progress.log(format!("  - {} Lagar Users", summary.users));
    progress.log(format!("  - {} Lagar Attendance Records", summary.attendance));

    if let Some(first) = companies.first() {
        let domain = lagar_core::demo::email_domain_slug(&first.name);
        progress.log("LAGAR LOGIN CREDENTIALS:");
        progress.log(format!(
            "Lagar Admin: lagaradmin1@{domain}.com / {ADMIN_PASSWORD}"
        ));
        progress.log(format!(
            "Lagar Staff: lagarstaff1.company1@{domain}.com / {STAFF_PASSWORD}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_progress_spans_band() {
        assert_eq!(attendance_progress(0, 100), 30);
        assert_eq!(attendance_progress(50, 100), 62);
        assert_eq!(attendance_progress(100, 100), 95);
        assert_eq!(attendance_progress(0, 0), 95);
    }
}
