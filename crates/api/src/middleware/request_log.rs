//! Per-request activity line: `{METHOD} {uri} - IP: {ip}`.
//!
//! Lines go through the [`ActivityLog`](lagar_events::ActivityLog), so
//! observers of `/events` see incoming requests too. The stream itself and
//! the viewer page are skipped; logging them would echo every observer's
//! own connection back to it.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

/// Paths that never produce a request line.
const QUIET_PATHS: [&str; 2] = ["/events", "/logs"];

pub async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !QUIET_PATHS.contains(&request.uri().path()) {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let ip = client_ip(request.headers(), peer)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        state
            .log
            .info(format!("{} {} - IP: {ip}", request.method(), request.uri()));
    }

    next.run(request).await
}

/// Resolve the client address.
///
/// Priority:
/// 1. First entry of `X-Forwarded-For` (requests through proxies)
/// 2. `X-Real-IP` (Nginx)
/// 3. The socket peer address
fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());
    if forwarded.is_some() {
        return forwarded;
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok());

    real_ip.or(peer)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn peer() -> Option<IpAddr> {
        Some("10.0.0.9".parse().unwrap())
    }

    #[test]
    fn forwarded_for_takes_priority() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(
            client_ip(&headers, peer()),
            Some("203.0.113.7".parse().unwrap())
        );
    }

    #[test]
    fn real_ip_beats_socket_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(
            client_ip(&headers, peer()),
            Some("198.51.100.2".parse().unwrap())
        );
    }

    #[test]
    fn falls_back_to_peer_then_nothing() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer()), peer());
        assert_eq!(client_ip(&headers, None), None);
    }
}
