use std::time::Duration;

use lagar_core::jobs::DEFAULT_POLL_INTERVAL;

/// Worker configuration loaded from environment variables.
///
/// | Env Var                     | Default    |
/// |-----------------------------|------------|
/// | `WORKER_POLL_INTERVAL_SECS` | `5`        |
/// | `WORKER_STALE_AFTER_SECS`   | disabled   |
/// | `PUSH_URL`                  | none       |
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Pause after a poll that found no PENDING job.
    pub poll_interval: Duration,
    /// Fail RUNNING jobs older than this before polling. `None` disables it.
    pub stale_after: Option<Duration>,
    /// External collector that receives every info log line.
    pub push_url: Option<String>,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        let poll_interval = std::env::var("WORKER_POLL_INTERVAL_SECS")
            .ok()
            .map(|v| parse_secs(&v).expect("WORKER_POLL_INTERVAL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let stale_after = std::env::var("WORKER_STALE_AFTER_SECS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_secs(&v).expect("WORKER_STALE_AFTER_SECS must be a valid u64"));

        let push_url = std::env::var("PUSH_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            poll_interval,
            stale_after,
            push_url,
        }
    }
}

fn parse_secs(value: &str) -> Option<Duration> {
    value.trim().parse().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_secs_accepts_whole_seconds() {
        assert_eq!(parse_secs("5"), Some(Duration::from_secs(5)));
        assert_eq!(parse_secs(" 900 "), Some(Duration::from_secs(900)));
    }

    #[test]
    fn parse_secs_rejects_garbage() {
        assert_eq!(parse_secs("five"), None);
        assert_eq!(parse_secs("-1"), None);
    }
}
