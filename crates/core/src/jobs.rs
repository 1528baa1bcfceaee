//! Background job constants shared by the API server and the seed worker.

use std::time::Duration;

/// The only job kind in the system: one full Lagar demo-data seed.
pub const JOB_KIND_LAGAR_SEED: &str = "LAGAR_SEED";

/// Progress value written when a job finishes successfully.
pub const PROGRESS_COMPLETE: i32 = 100;

/// How long the worker sleeps when no pending job is found.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Execution mode of the seed controller.
///
/// `Inline` runs the generator inside the HTTP process and tracks the active
/// run in memory. `Queued` only writes a PENDING job row; a separate worker
/// process claims and executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    Inline,
    Queued,
}

impl SeedMode {
    /// Parse the `SEED_MODE` setting. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inline" | "in-process" => Some(Self::Inline),
            "queued" | "worker" => Some(Self::Queued),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Queued => "queued",
        }
    }
}

/// Describe why a progress report is out of bounds, if it is.
///
/// Progress is advisory and never rejected; callers log the returned text.
/// Decreasing values are accepted silently.
pub fn progress_anomaly(current: i32, total: i32) -> Option<String> {
    if current < 0 {
        return Some(format!("negative progress {current}"));
    }
    if total < 0 {
        return Some(format!("negative total {total}"));
    }
    if current > total {
        return Some(format!("progress {current} exceeds total {total}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_mode_parses_known_values() {
        assert_eq!(SeedMode::parse("inline"), Some(SeedMode::Inline));
        assert_eq!(SeedMode::parse(" Queued "), Some(SeedMode::Queued));
        assert_eq!(SeedMode::parse("worker"), Some(SeedMode::Queued));
        assert_eq!(SeedMode::parse("cron"), None);
    }

    #[test]
    fn seed_mode_round_trips_through_as_str() {
        for mode in [SeedMode::Inline, SeedMode::Queued] {
            assert_eq!(SeedMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn progress_within_bounds_is_not_an_anomaly() {
        assert_eq!(progress_anomaly(0, 100), None);
        assert_eq!(progress_anomaly(100, 100), None);
    }

    #[test]
    fn progress_out_of_bounds_is_described() {
        assert!(progress_anomaly(-1, 100).unwrap().contains("negative"));
        assert!(progress_anomaly(5, -1).unwrap().contains("negative total"));
        assert!(progress_anomaly(120, 100).unwrap().contains("exceeds"));
    }
}
