//! Application-layer rate limiting for signin and signup routes

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Fixed-window policy for one route
struct Limit {
    route: &'static str,
    max_requests: u32,
    window: Duration,
}

const SIGNIN_LIMIT: Limit = Limit {
    route: "signin",
    max_requests: 5,
    window: Duration::from_secs(60),
};

const SIGNUP_LIMIT: Limit = Limit {
    route: "signup",
    max_requests: 3,
    window: Duration::from_secs(60),
};

/// Entries idle longer than this are dropped by the cleanup task
const MAX_IDLE: Duration = Duration::from_secs(300);

struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window counter keyed by `route:ip`
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Count the request; `false` means the caller exhausted the window.
    async fn allow(&self, limit: &Limit, ip: &str) -> bool {
        let key = format!("{}:{ip}", limit.route);
        let now = Instant::now();

        let mut windows = self.windows.lock().await;
        let window = windows.entry(key).or_insert(Window {
            count: 0,
            started: now,
        });

        if now.duration_since(window.started) >= limit.window {
            window.count = 0;
            window.started = now;
        }

        window.count += 1;
        window.count <= limit.max_requests
    }

    /// Drop windows that have been idle past [`MAX_IDLE`]
    pub async fn cleanup(&self) {
        let now = Instant::now();
        self.windows
            .lock()
            .await
            .retain(|_, w| now.duration_since(w.started) < MAX_IDLE);
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Client IP: first X-Forwarded-For entry (reverse proxy) when present,
/// otherwise the peer address.
fn extract_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

pub async fn signin_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    if !state.rate_limiter.allow(&SIGNIN_LIMIT, &ip).await {
        return Err(AppError::new(ErrorCode::RateLimited));
    }
    Ok(next.run(request).await)
}

pub async fn signup_rate_limit(
    State(state): State<crate::state::AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request);
    if !state.rate_limiter.allow(&SIGNUP_LIMIT, &ip).await {
        return Err(AppError::new(ErrorCode::RateLimited));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_enforced_per_route_and_ip() {
        let limiter = RateLimiter::new();

        for _ in 0..SIGNUP_LIMIT.max_requests {
            assert!(limiter.allow(&SIGNUP_LIMIT, "1.2.3.4").await);
        }
        // Next request inside the window is rejected
        assert!(!limiter.allow(&SIGNUP_LIMIT, "1.2.3.4").await);

        // A different IP and a different route are unaffected
        assert!(limiter.allow(&SIGNUP_LIMIT, "5.6.7.8").await);
        assert!(limiter.allow(&SIGNIN_LIMIT, "1.2.3.4").await);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_active_windows() {
        let limiter = RateLimiter::new();
        assert!(limiter.allow(&SIGNIN_LIMIT, "1.2.3.4").await);

        limiter.cleanup().await;

        // The window was just started, so the count carries over
        for _ in 1..SIGNIN_LIMIT.max_requests {
            assert!(limiter.allow(&SIGNIN_LIMIT, "1.2.3.4").await);
        }
        assert!(!limiter.allow(&SIGNIN_LIMIT, "1.2.3.4").await);
    }
}
