use lagar_core::jobs::SeedMode;

/// Wildcard entry in `CORS_ORIGINS` that allows any origin.
pub const ANY_ORIGIN: &str = "*";

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows every origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Not applied to the
    /// event stream.
    pub request_timeout_secs: u64,
    /// Where seed runs execute (default: inline).
    pub seed_mode: SeedMode,
    /// Optional external collector that receives every info log line.
    pub push_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3000`    |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `SEED_MODE`            | `inline`  |
    /// | `PUSH_URL`             | unset     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| ANY_ORIGIN.into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let seed_mode = match std::env::var("SEED_MODE") {
            Ok(value) => SeedMode::parse(&value)
                .unwrap_or_else(|| panic!("SEED_MODE must be 'inline' or 'queued', got '{value}'")),
            Err(_) => SeedMode::Inline,
        };

        let push_url = std::env::var("PUSH_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            seed_mode,
            push_url,
        }
    }

    /// Whether CORS should answer with `Access-Control-Allow-Origin: *`.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == ANY_ORIGIN)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn wildcard_origin_is_detected() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: parse_origins("*"),
            request_timeout_secs: 30,
            seed_mode: SeedMode::Inline,
            push_url: None,
        };
        assert!(config.allows_any_origin());

        let config = ServerConfig {
            cors_origins: parse_origins("http://localhost:5173"),
            ..config
        };
        assert!(!config.allows_any_origin());
    }
}
