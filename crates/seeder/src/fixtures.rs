//! Fixed demo data: company list, name pools, credentials and payroll
//! parameters shared by every seeded company.

/// Plaintext password of every demo admin.
pub const ADMIN_PASSWORD: &str = "lagaradmin123";

/// Plaintext password of every demo staff member.
pub const STAFF_PASSWORD: &str = "lagarstaff123";

pub struct CompanyFixture {
    pub name: &'static str,
    pub industry: &'static str,
    pub size: &'static str,
}

const fn company(
    name: &'static str,
    industry: &'static str,
    size: &'static str,
) -> CompanyFixture {
    CompanyFixture {
        name,
        industry,
        size,
    }
}

pub const COMPANIES: [CompanyFixture; 15] = [
    company("Lagar Industries", "Manufacturing", "Large"),
    company("Lagar Tech Solutions", "Technology", "Medium"),
    company("Lagar Financial Services", "Finance", "Large"),
    company("Lagar Healthcare", "Healthcare", "Medium"),
    company("Lagar Logistics", "Transportation", "Large"),
    company("Lagar Construction", "Construction", "Large"),
    company("Lagar Retail Chain", "Retail", "Medium"),
    company("Lagar Education Services", "Education", "Large"),
    company("Lagar Hospitality Group", "Hospitality", "Medium"),
    company("Lagar Energy Solutions", "Energy", "Large"),
    company("Lagar Automotive", "Automotive", "Medium"),
    company("Lagar Pharmaceuticals", "Pharmaceuticals", "Large"),
    company("Lagar Telecom", "Telecommunications", "Medium"),
    company("Lagar Media Corp", "Media", "Large"),
    company("Lagar Consulting", "Consulting", "Medium"),
];

pub const FIRST_NAMES: [&str; 10] = [
    "Arjun", "Priya", "Rohan", "Ananya", "Vikram", "Kavya", "Aditya", "Sneha", "Rahul", "Megha",
];

pub const LAST_NAMES: [&str; 10] = [
    "Sharma", "Verma", "Gupta", "Singh", "Patel", "Jain", "Agarwal", "Yadav", "Mishra", "Chauhan",
];

// --- Company defaults ---

pub const SHIFT_START: &str = "09:00";
pub const SHIFT_END: &str = "18:00";
pub const GRACE_PERIOD_MINUTES: i32 = 15;

/// Office locations are jittered up to one degree either way around New Delhi.
pub const BASE_LAT: f64 = 28.6139;
pub const BASE_LNG: f64 = 77.209;
pub const LOCATION_JITTER_DEGREES: f64 = 1.0;
pub const LOCATION_RADIUS_METERS: f64 = 100.0;

pub const OVERTIME_MULTIPLIER: f64 = 1.5;
pub const LATE_PENALTY_PER_MINUTE: f64 = 2.0;
pub const ABSENT_PENALTY_PER_DAY: f64 = 500.0;
pub const PF_PERCENTAGE: f64 = 12.0;
pub const ESI_PERCENTAGE: f64 = 0.75;

// --- Users ---

pub const STAFF_PER_COMPANY_MIN: usize = 50;
pub const STAFF_PER_COMPANY_MAX: usize = 80;
pub const WORKING_DAYS_PER_MONTH: i32 = 26;
pub const ADMIN_BASE_SALARY: f64 = 90_000.0;
pub const ADMIN_TENURE_DAYS: i64 = 365;
pub const ADMIN_PHONE_BASE: u64 = 9_500_000_000;
pub const STAFF_PHONE_BASE: u64 = 9_600_000_000;
pub const PF_ESI_PROBABILITY: f64 = 0.7;

// --- Attendance ---

pub const ATTENDANCE_DAYS: i64 = 180;
pub const SATURDAY_SKIP_PROBABILITY: f64 = 0.4;
