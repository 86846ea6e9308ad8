//! Fixed-window counter implementation.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Limiter tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Window length. Default: 60 seconds.
    pub window: Duration,
    /// Maximum requests per window. Default: 20.
    pub max_requests: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 20,
        }
    }
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// When the current window ends.
    pub reset_at: SystemTime,
    /// Present iff rejected.
    pub reason: Option<String>,
}

/// One user's active window.
#[derive(Debug, Clone)]
struct Window {
    count: u32,
    reset_at: SystemTime,
}

/// Per-user fixed-window rate limiter.
pub struct RateLimiter {
    config: RateLimiterConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Limiter with the default 20-requests-per-minute policy.
    pub fn new() -> Self {
        Self::with_config(RateLimiterConfig::default())
    }

    /// Limiter with a custom window policy.
    pub fn with_config(config: RateLimiterConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Charge one request against `user_id`'s window.
    ///
    /// A first request, or any request after the window has expired, starts
    /// a fresh window with count 1. Within an active window the counter is
    /// incremented until the maximum; at the maximum the request is rejected
    /// and the counter stays put.
    pub fn check(&self, user_id: &str) -> RateLimitDecision {
        self.check_at(user_id, SystemTime::now())
    }

    /// `check` against an explicit clock reading. Exists so window-rollover
    /// behavior can be tested deterministically.
    pub(crate) fn check_at(&self, user_id: &str, now: SystemTime) -> RateLimitDecision {
        let mut windows = self.windows.lock();

        let expired = windows
            .get(user_id)
            .map(|w| w.reset_at <= now)
            .unwrap_or(true);

        if expired {
            let reset_at = now + self.config.window;
            windows.insert(
                user_id.to_string(),
                Window {
                    count: 1,
                    reset_at,
                },
            );
            return RateLimitDecision {
                allowed: true,
                remaining: self.config.max_requests - 1,
                reset_at,
                reason: None,
            };
        }

        let window = windows.get_mut(user_id).expect("window exists");
        if window.count >= self.config.max_requests {
            warn!(user_id, count = window.count, "rate limit exceeded");
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: window.reset_at,
                reason: Some("Rate limit exceeded".to_string()),
            };
        }

        window.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: self.config.max_requests - window.count,
            reset_at: window.reset_at,
            reason: None,
        }
    }

    /// Number of users with an active window. For observability only.
    pub fn tracked_users(&self) -> usize {
        self.windows.lock().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
