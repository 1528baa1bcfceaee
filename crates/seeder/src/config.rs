/// Seeder settings loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    /// Delete attendance, users and companies before seeding
    /// (`CLEAR_DB_BEFORE_LAGAR_SEEDING`, default `false`).
    pub clear_before_seeding: bool,
}

impl SeedConfig {
    pub fn from_env() -> Self {
        let clear_before_seeding = std::env::var("CLEAR_DB_BEFORE_LAGAR_SEEDING")
            .map(|v| is_enabled(&v))
            .unwrap_or(false);
        Self {
            clear_before_seeding,
        }
    }
}

/// Only the literal `true` enables the flag.
fn is_enabled(value: &str) -> bool {
    value.trim() == "true"
}
