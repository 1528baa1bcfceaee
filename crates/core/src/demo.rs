//! Well-known values stored in the demo tables.
//!
//! These must match the CHECK constraints in
//! `20260301000002_create_demo_tables.sql`.

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_STAFF: &str = "STAFF";

pub const ACCOUNT_ACTIVE: &str = "ACTIVE";

pub const SALARY_MONTHLY: &str = "MONTHLY";
pub const SALARY_HOURLY: &str = "HOURLY";
pub const SALARY_DAILY: &str = "DAILY";

/// All salary types, in the order they are drawn from.
pub const SALARY_TYPES: [&str; 3] = [SALARY_MONTHLY, SALARY_HOURLY, SALARY_DAILY];

/// Turn a company name into the domain part of its demo e-mail addresses.
///
/// `"Lagar Tech Solutions"` becomes `"lagartechsolutions"`.
pub fn email_domain_slug(company_name: &str) -> String {
    company_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
