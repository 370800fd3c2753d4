//! Fixed-window rate limiter middleware.
//!
//! Limits requests to a configurable number per second using an atomic
//! counter that resets each second. Applied as an axum middleware.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{Extension, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorBody;

/// Shared state for the rate limiter.
///
/// The window (epoch second) and the request count share one atomic word,
/// window in the high 32 bits, so a window rollover and its counter reset
/// happen in a single update.
#[derive(Clone)]
pub struct RateLimiter {
    /// Maximum requests allowed per second; 0 disables limiting.
    max_per_sec: u64,
    state: Arc<AtomicU64>,
}

const COUNT_MASK: u64 = u32::MAX as u64;

impl RateLimiter {
    /// Create a new rate limiter allowing `max_per_sec` requests per second.
    pub fn new(max_per_sec: u64) -> Self {
        Self {
            max_per_sec,
            state: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Try to acquire a permit. Returns true if the request is allowed.
    pub fn try_acquire(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.try_acquire_at(now)
    }

    fn try_acquire_at(&self, now: u64) -> bool {
        if self.max_per_sec == 0 {
            return true;
        }

        let window = now & COUNT_MASK;
        let previous = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |packed| {
                let count = if packed >> 32 == window {
                    (packed & COUNT_MASK).saturating_add(1).min(COUNT_MASK)
                } else {
                    1
                };
                Some((window << 32) | count)
            })
            .unwrap_or_default();

        let prior_count = if previous >> 32 == window {
            previous & COUNT_MASK
        } else {
            0
        };
        prior_count < self.max_per_sec
    }
}

/// Axum middleware that enforces the rate limit.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<RateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire() {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "Rate limit exceeded");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorBody {
                error: "too_many_requests".to_string(),
                message: "Rate limit exceeded".to_string(),
                details: None,
            }),
        )
            .into_response()
    }
}
