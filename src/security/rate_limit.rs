//! Fixed-window rate limiting per client IP.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Request count for one client within the current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the client's window closes.
    pub reset_after: Duration,
}

impl Decision {
    fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// Unix time (seconds, rounded up) at which the window closes.
    fn reset_epoch_secs(&self, now: SystemTime) -> u64 {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let reset = since_epoch + self.reset_after;
        reset.as_secs() + u64::from(reset.subsec_nanos() > 0)
    }

    fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(
            X_RATELIMIT_RESET,
            HeaderValue::from(self.reset_epoch_secs(SystemTime::now())),
        );
    }
}

/// Per-IP request counters.
///
/// Each client gets a window that opens on its first request and lasts
/// `window`. Requests past `max_requests` within the window are rejected.
/// State is process-local and lost on restart.
pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
    window: Duration,
    max_requests: u32,
    message: String,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: DashMap::new(),
            window: config.window(),
            max_requests: config.max_requests,
            message: config.message.clone(),
        }
    }

    /// Count a request from `client` and decide whether it may proceed.
    pub fn check(&self, client: IpAddr) -> Decision {
        self.check_at(client, Instant::now())
    }

    /// Shorthand for `check(client).allowed`.
    pub fn allow(&self, client: IpAddr) -> bool {
        self.check(client).allowed
    }

    fn check_at(&self, client: IpAddr, now: Instant) -> Decision {
        // The entry guard holds the shard lock, so increment-and-compare is atomic per client.
        let mut entry = self.windows.entry(client).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now >= entry.reset_at {
            entry.count = 0;
            entry.reset_at = now + self.window;
        }
        entry.count = entry.count.saturating_add(1);

        Decision {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_after: entry.reset_at.saturating_duration_since(now),
        }
    }

    /// Drop windows that have already closed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    fn sweep_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| w.reset_at > now);
        before.saturating_sub(self.windows.len())
    }

    /// Number of clients with a tracked window.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Periodically sweep expired windows, once per window length.
    pub fn spawn_sweeper(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    tracing::debug!(
                        removed,
                        remaining = limiter.tracked_clients(),
                        "Swept rate limit windows"
                    );
                }
            }
        })
    }

    fn reject(&self, decision: &Decision) -> Response {
        let mut response = (StatusCode::TOO_MANY_REQUESTS, self.message.clone()).into_response();
        let headers = response.headers_mut();
        decision.apply_headers(headers);
        headers.insert(header::RETRY_AFTER, HeaderValue::from(decision.reset_secs()));
        response
    }
}

/// Middleware enforcing the per-IP limit before the request reaches a handler.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = addr.ip();
    let decision = limiter.check(client);

    if !decision.allowed {
        tracing::warn!(client = %client, limit = decision.limit, "Rate limit exceeded");
        return limiter.reject(&decision);
    }

    let mut response = next.run(request).await;
    decision.apply_headers(response.headers_mut());
    response
}
