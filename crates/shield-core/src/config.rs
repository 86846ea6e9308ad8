//! Configuration for the secure pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use shield_filter::FilterConfig;
use shield_hitl::HitlConfig;
use shield_limiter::RateLimiterConfig;

/// Top-level configuration, one section per component plus the pipeline's
/// own knobs. Everything here is a tunable, not a hard-coded business rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// Injection Filter scoring policy.
    pub filter: FilterConfig,

    /// Rate Limiter window policy.
    pub limiter: RateLimiterConfig,

    /// HITL review policy.
    pub hitl: HitlConfig,

    /// Upper bound on the model call. Past this the pipeline surfaces a
    /// timeout error, distinct from any security denial.
    pub execution_timeout: Duration,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            limiter: RateLimiterConfig::default(),
            hitl: HitlConfig::default(),
            execution_timeout: Duration::from_secs(30),
        }
    }
}
