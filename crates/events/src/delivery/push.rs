//! HTTP push of log lines to an external collector.
//!
//! [`PushDelivery`] POSTs `{"message", "timestamp"}` JSON to one URL. A
//! delivery is a single attempt with a short timeout: log lines are advisory
//! and a retry would only reorder them. Loopback targets are refused at
//! construction so a collector pointed at this very process cannot create a
//! feedback loop during local development.

use std::net::IpAddr;
use std::time::Duration;

use reqwest::Url;

use crate::broadcaster::ProgressEvent;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The configured URL could not be parsed.
    #[error("Invalid push URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Push endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PushDelivery
// ---------------------------------------------------------------------------

/// Delivers log lines to an external push endpoint.
#[derive(Clone)]
pub struct PushDelivery {
    client: reqwest::Client,
    url: Url,
}

impl PushDelivery {
    /// Build a delivery for `url`.
    ///
    /// Returns `Ok(None)` when the URL points at a loopback host, in which
    /// case nothing should be pushed.
    pub fn new(url: &str) -> Result<Option<Self>, PushError> {
        let url = Url::parse(url).map_err(|e| PushError::InvalidUrl(format!("{url}: {e}")))?;

        if is_loopback_target(&url) {
            return Ok(None);
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Some(Self { client, url }))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Execute a single POST request and check the response status.
    pub async fn deliver(&self, event: &ProgressEvent) -> Result<(), PushError> {
        let response = self.client.post(self.url.clone()).json(event).send().await?;
        if !response.status().is_success() {
            return Err(PushError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Whether `url` targets this machine (`localhost`, `*.localhost`,
/// `127.0.0.0/8`, `::1`).
pub fn is_loopback_target(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']');

    if let Ok(ip) = host.parse::<IpAddr>() {
        return ip.is_loopback();
    }

    let host = host.to_ascii_lowercase();
    host == "localhost" || host.ends_with(".localhost")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
