//! Pure row builders for the demo data set.
//!
//! Nothing here touches the database; every function takes the random
//! source explicitly so tests can use a seeded [`StdRng`](rand::rngs::StdRng).

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use lagar_core::demo::{
    email_domain_slug, ACCOUNT_ACTIVE, ROLE_ADMIN, ROLE_STAFF, SALARY_DAILY, SALARY_HOURLY,
    SALARY_MONTHLY, SALARY_TYPES,
};
use lagar_core::types::{DbId, Timestamp};
use lagar_db::models::attendance::NewAttendance;
use lagar_db::models::company::{Company, NewCompany};
use lagar_db::models::status::AttendanceStatus;
use lagar_db::models::user::{NewUser, UserRef};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::fixtures::*;

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

pub fn plan_companies<R: Rng + ?Sized>(rng: &mut R) -> Vec<NewCompany> {
    COMPANIES
        .iter()
        .map(|fixture| NewCompany {
            name: fixture.name.to_string(),
            description: format!("{} - Specialized in {}", fixture.name, fixture.industry),
            industry: fixture.industry.to_string(),
            size: fixture.size.to_string(),
            status: ACCOUNT_ACTIVE.to_string(),
            shift_start_time: SHIFT_START.to_string(),
            shift_end_time: SHIFT_END.to_string(),
            grace_period_minutes: GRACE_PERIOD_MINUTES,
            location_lat: BASE_LAT + jitter(rng),
            location_lng: BASE_LNG + jitter(rng),
            location_radius: LOCATION_RADIUS_METERS,
            default_salary_type: pick_salary_type(rng).to_string(),
            overtime_multiplier: OVERTIME_MULTIPLIER,
            late_penalty_per_minute: LATE_PENALTY_PER_MINUTE,
            absent_penalty_per_day: ABSENT_PENALTY_PER_DAY,
            pf_percentage: PF_PERCENTAGE,
            esi_percentage: ESI_PERCENTAGE,
        })
        .collect()
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-LOCATION_JITTER_DEGREES..LOCATION_JITTER_DEGREES)
}

fn pick_salary_type<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SALARY_TYPES.choose(rng).copied().unwrap_or(SALARY_MONTHLY)
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Password hashes shared by every admin and every staff member.
pub struct DemoPasswords {
    pub admin_hash: String,
    pub staff_hash: String,
}

/// Users of one company: one admin followed by its staff.
pub fn plan_company_users<R: Rng + ?Sized>(
    index: usize,
    company: &Company,
    passwords: &DemoPasswords,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<NewUser> {
    let number = index + 1;
    let domain = email_domain_slug(&company.name);
    let staff_count = rng.random_range(STAFF_PER_COMPANY_MIN..=STAFF_PER_COMPANY_MAX);

    let mut users = Vec::with_capacity(staff_count + 1);
    users.push(NewUser {
        company_id: company.id,
        email: format!("lagaradmin{number}@{domain}.com"),
        phone: format!("+91{}", ADMIN_PHONE_BASE + index as u64),
        password_hash: passwords.admin_hash.clone(),
        role: ROLE_ADMIN.to_string(),
        status: ACCOUNT_ACTIVE.to_string(),
        first_name: format!("LagarAdmin{number}"),
        last_name: company
            .name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
        onboarding_completed: true,
        base_salary: Some(ADMIN_BASE_SALARY),
        hourly_rate: None,
        daily_rate: None,
        salary_type: SALARY_MONTHLY.to_string(),
        working_days: WORKING_DAYS_PER_MONTH,
        pf_esi_applicable: true,
        joining_date: today - Duration::days(ADMIN_TENURE_DAYS),
    });

    for j in 0..staff_count {
        let salary_type = pick_salary_type(rng);
        let (base_salary, hourly_rate, daily_rate) = match salary_type {
            SALARY_HOURLY => (None, Some(rng.random_range(200..=500) as f64), None),
            SALARY_DAILY => (None, None, Some(rng.random_range(1_000..=2_500) as f64)),
            _ => (Some(rng.random_range(30_000..=70_000) as f64), None, None),
        };

        users.push(NewUser {
            company_id: company.id,
            email: format!("lagarstaff{}.company{number}@{domain}.com", j + 1),
            phone: format!("+91{}", STAFF_PHONE_BASE + (index * 100 + j) as u64),
            password_hash: passwords.staff_hash.clone(),
            role: ROLE_STAFF.to_string(),
            status: ACCOUNT_ACTIVE.to_string(),
            first_name: pick(&FIRST_NAMES, rng).to_string(),
            last_name: pick(&LAST_NAMES, rng).to_string(),
            onboarding_completed: true,
            base_salary,
            hourly_rate,
            daily_rate,
            salary_type: salary_type.to_string(),
            working_days: WORKING_DAYS_PER_MONTH,
            pf_esi_applicable: rng.random_bool(PF_ESI_PROBABILITY),
            joining_date: today - Duration::days(rng.random_range(30..=730)),
        });
    }

    users
}

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Map each company to the id of its admin.
pub fn admins_by_company(users: &[UserRef]) -> HashMap<DbId, DbId> {
    users
        .iter()
        .filter(|u| u.role == ROLE_ADMIN)
        .map(|u| (u.company_id, u.id))
        .collect()
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayKind {
    Present,
    Absent,
    Leave,
    Late,
}

/// Present four times as likely as each other outcome.
const DAY_KINDS: [DayKind; 7] = [
    DayKind::Present,
    DayKind::Present,
    DayKind::Present,
    DayKind::Present,
    DayKind::Absent,
    DayKind::Leave,
    DayKind::Late,
];

/// First day of the attendance window ending before `today`.
pub fn attendance_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ATTENDANCE_DAYS)
}

/// Attendance rows for one staff member across the whole window.
///
/// Sundays are skipped, Saturdays are skipped with probability 0.4.
/// Approved days name `approver` (the company admin).
pub fn plan_attendance<R: Rng + ?Sized>(
    user: &UserRef,
    approver: Option<DbId>,
    window_start: NaiveDate,
    rng: &mut R,
) -> Vec<NewAttendance> {
    let mut rows = Vec::new();

    for offset in 0..ATTENDANCE_DAYS {
        let date = window_start + Duration::days(offset);
        match date.weekday() {
            Weekday::Sun => continue,
            Weekday::Sat if rng.random_bool(SATURDAY_SKIP_PROBABILITY) => continue,
            _ => {}
        }

        let kind = DAY_KINDS.choose(rng).copied().unwrap_or(DayKind::Present);
        rows.push(plan_day(user, approver, date, kind, rng));
    }

    rows
}

fn plan_day<R: Rng + ?Sized>(
    user: &UserRef,
    approver: Option<DbId>,
    date: NaiveDate,
    kind: DayKind,
    rng: &mut R,
) -> NewAttendance {
    let day_start = date.and_time(chrono::NaiveTime::MIN).and_utc();

    let (punch, status) = match kind {
        DayKind::Present => (
            Some(punch_pair(day_start, 8..=11, 7.0, 3.0, rng)),
            AttendanceStatus::Approved,
        ),
        DayKind::Late => (
            Some(punch_pair(day_start, 10..=12, 6.0, 2.0, rng)),
            AttendanceStatus::Approved,
        ),
        DayKind::Absent => (None, AttendanceStatus::Absent),
        DayKind::Leave => (None, AttendanceStatus::Leave),
    };

    let approved = status == AttendanceStatus::Approved;
    NewAttendance {
        user_id: user.id,
        company_id: user.company_id,
        attendance_date: date,
        punch_in: punch.map(|(punch_in, _, _)| punch_in),
        punch_out: punch.map(|(_, punch_out, _)| punch_out),
        working_hours: punch.map(|(_, _, hours)| hours),
        status,
        approved_by: if approved { approver } else { None },
        approved_at: approved.then(|| day_start + Duration::hours(rng.random_range(1..=8))),
    }
}

/// Punch-in within `hours`, a random minute, then `base + [0, spread)` hours
/// of work. Returns punch in, punch out and hours rounded to two decimals.
fn punch_pair<R: Rng + ?Sized>(
    day_start: Timestamp,
    hours: std::ops::RangeInclusive<i64>,
    base: f64,
    spread: f64,
    rng: &mut R,
) -> (Timestamp, Timestamp, f64) {
    let punch_in =
        day_start + Duration::hours(rng.random_range(hours)) + Duration::minutes(rng.random_range(0..60));
    let worked = base + rng.random_range(0.0..spread);
    let punch_out = punch_in + Duration::milliseconds((worked * 3_600_000.0) as i64);
    (punch_in, punch_out, (worked * 100.0).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn company(id: DbId, name: &str) -> Company {
        Company {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    fn passwords() -> DemoPasswords {
        DemoPasswords {
            admin_hash: "admin-hash".to_string(),
            staff_hash: "staff-hash".to_string(),
        }
    }

    fn staff(id: DbId) -> UserRef {
        UserRef {
            id,
            company_id: 1,
            role: ROLE_STAFF.to_string(),
            email: "lagarstaff1.company1@lagarindustries.com".to_string(),
        }
    }

    #[test]
    fn companies_follow_fixture_list() {
        let mut rng = StdRng::seed_from_u64(1);
        let companies = plan_companies(&mut rng);

        assert_eq!(companies.len(), 15);
        assert_eq!(companies[0].name, "Lagar Industries");
        assert_eq!(
            companies[0].description,
            "Lagar Industries - Specialized in Manufacturing"
        );
        for c in &companies {
            assert_eq!(c.shift_start_time, "09:00");
            assert_eq!(c.grace_period_minutes, 15);
            assert!((c.location_lat - BASE_LAT).abs() <= 1.0);
            assert!((c.location_lng - BASE_LNG).abs() <= 1.0);
            assert!(SALARY_TYPES.contains(&c.default_salary_type.as_str()));
        }
    }

    #[test]
    fn company_users_have_one_admin_and_50_to_80_staff() {
        let mut rng = StdRng::seed_from_u64(2);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let users = plan_company_users(1, &company(42, "Lagar Tech Solutions"), &passwords(), today, &mut rng);

        let admin = &users[0];
        assert_eq!(admin.role, ROLE_ADMIN);
        assert_eq!(admin.email, "lagaradmin2@lagartechsolutions.com");
        assert_eq!(admin.phone, "+919500000001");
        assert_eq!(admin.last_name, "Lagar");
        assert_eq!(admin.base_salary, Some(90_000.0));
        assert_eq!(admin.joining_date, today - Duration::days(365));

        let staff: Vec<_> = users.iter().skip(1).collect();
        assert!((50..=80).contains(&staff.len()));
        assert!(staff.iter().all(|u| u.role == ROLE_STAFF && u.company_id == 42));
        assert_eq!(staff[0].email, "lagarstaff1.company2@lagartechsolutions.com");
        assert_eq!(staff[0].phone, "+919600000100");
        assert_eq!(staff[0].password_hash, "staff-hash");
    }

    #[test]
    fn staff_pay_matches_salary_type() {
        let mut rng = StdRng::seed_from_u64(3);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let users = plan_company_users(0, &company(1, "Lagar Industries"), &passwords(), today, &mut rng);

        for user in users.iter().skip(1) {
            match user.salary_type.as_str() {
                SALARY_MONTHLY => {
                    let pay = user.base_salary.unwrap();
                    assert!((30_000.0..=70_000.0).contains(&pay));
                    assert!(user.hourly_rate.is_none() && user.daily_rate.is_none());
                }
                SALARY_HOURLY => {
                    assert!((200.0..=500.0).contains(&user.hourly_rate.unwrap()));
                    assert!(user.base_salary.is_none());
                }
                SALARY_DAILY => {
                    assert!((1_000.0..=2_500.0).contains(&user.daily_rate.unwrap()));
                    assert!(user.base_salary.is_none());
                }
                other => panic!("unexpected salary type {other}"),
            }
            let tenure = (today - user.joining_date).num_days();
            assert!((30..=730).contains(&tenure));
        }
    }

    #[test]
    fn attendance_skips_sundays_and_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(4);
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let start = attendance_window_start(today);
        let rows = plan_attendance(&staff(9), Some(1), start, &mut rng);

        assert!(!rows.is_empty());
        assert!(rows.len() < 180);
        assert!(rows.iter().all(|r| r.attendance_date.weekday() != Weekday::Sun));
        assert!(rows
            .iter()
            .all(|r| r.attendance_date >= start && r.attendance_date < today));
    }

    #[test]
    fn attendance_rows_are_consistent_with_status() {
        let mut rng = StdRng::seed_from_u64(5);
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let rows = plan_attendance(&staff(9), Some(77), start, &mut rng);

        for row in rows {
            match row.status {
                AttendanceStatus::Approved => {
                    let punch_in = row.punch_in.unwrap();
                    let punch_out = row.punch_out.unwrap();
                    assert!(punch_out > punch_in);
                    let hours = row.working_hours.unwrap();
                    assert!((6.0..=10.0).contains(&hours));
                    assert_eq!(row.approved_by, Some(77));
                    assert!(row.approved_at.is_some());
                }
                AttendanceStatus::Absent | AttendanceStatus::Leave => {
                    assert!(row.punch_in.is_none() && row.punch_out.is_none());
                    assert!(row.working_hours.is_none());
                    assert!(row.approved_by.is_none() && row.approved_at.is_none());
                }
                AttendanceStatus::Pending => panic!("demo rows are never pending"),
            }
        }
    }

    #[test]
    fn admins_are_indexed_by_company() {
        let users = vec![
            UserRef {
                id: 10,
                company_id: 1,
                role: ROLE_ADMIN.to_string(),
                email: "a@x.com".to_string(),
            },
            staff(11),
            UserRef {
                id: 20,
                company_id: 2,
                role: ROLE_ADMIN.to_string(),
                email: "b@x.com".to_string(),
            },
        ];

        let admins = admins_by_company(&users);
        assert_eq!(admins.len(), 2);
        assert_eq!(admins[&1], 10);
        assert_eq!(admins[&2], 20);
    }
}
