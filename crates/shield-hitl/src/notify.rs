//! Security notification interface.
//!
//! The pipeline and the HITL controller both emit security events; where
//! those events go (email, Slack, PagerDuty, a webhook) is deployment
//! policy, hidden behind one trait. Delivery must never affect request
//! handling: callers log and swallow sink failures.

use serde::{Deserialize, Serialize};
use shield_filter::RiskLevel;
use thiserror::Error;
use tracing::warn;

/// Kinds of security events this subsystem emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityEventKind {
    /// The filter matched injection signatures in an input.
    InjectionDetected,
    /// A critical-risk input was hard-blocked.
    InjectionBlocked,
    /// The output validator found violations in a model response.
    OutputViolation,
    /// A user exceeded their request quota.
    RateLimitExceeded,
    /// A high-risk request was escalated for human review.
    ReviewRequested,
}

impl std::fmt::Display for SecurityEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InjectionDetected => "PROMPT_INJECTION_DETECTED",
            Self::InjectionBlocked => "PROMPT_INJECTION_BLOCKED",
            Self::OutputViolation => "OUTPUT_VIOLATION_DETECTED",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::ReviewRequested => "HITL_REVIEW_REQUESTED",
        };
        write!(f, "{}", s)
    }
}

/// One security event with whatever context the emitter had.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// What happened.
    pub kind: SecurityEventKind,
    /// User whose request triggered the event, if known.
    pub user_id: Option<String>,
    /// Assessed risk level, for filter-originated events.
    pub risk_level: Option<RiskLevel>,
    /// Matched pattern categories, for filter-originated events.
    pub categories: Vec<String>,
    /// Final detection confidence, for filter-originated events.
    pub confidence: Option<f64>,
    /// Violation codes, for output-originated events.
    pub violations: Vec<String>,
    /// Review id, for escalation events.
    pub review_id: Option<String>,
}

impl SecurityEvent {
    /// An event with only its kind set; builder methods fill in context.
    pub fn new(kind: SecurityEventKind) -> Self {
        Self {
            kind,
            user_id: None,
            risk_level: None,
            categories: Vec::new(),
            confidence: None,
            violations: Vec::new(),
            review_id: None,
        }
    }

    /// Attach the requesting user.
    pub fn user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Attach a risk level without full filter context.
    pub fn risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = Some(risk_level);
        self
    }

    /// Attach filter context.
    pub fn detection(mut self, risk_level: RiskLevel, categories: &[String], confidence: f64) -> Self {
        self.risk_level = Some(risk_level);
        self.categories = categories.to_vec();
        self.confidence = Some(confidence);
        self
    }

    /// Attach output-validator context.
    pub fn violations(mut self, violations: &[String]) -> Self {
        self.violations = violations.to_vec();
        self
    }

    /// Attach a review id.
    pub fn review(mut self, review_id: &str) -> Self {
        self.review_id = Some(review_id.to_string());
        self
    }
}

/// Notification delivery failure.
///
/// Carried for logging only; callers must swallow it.
#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Where security events go.
///
/// Implementations deliver to the team's alerting channel of choice.
/// Delivery is fire-and-forget with respect to request handling: a failed
/// `notify` must never change an allow/deny outcome already decided.
pub trait NotificationSink: Send + Sync {
    /// Deliver one event.
    fn notify(&self, event: SecurityEvent) -> Result<(), NotifyError>;
}

/// Default sink: structured log lines, no external delivery.
///
/// Suitable for development and tests; production deployments supply their
/// own sink.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: SecurityEvent) -> Result<(), NotifyError> {
        warn!(
            kind = %event.kind,
            user_id = event.user_id.as_deref().unwrap_or("-"),
            risk_level = event.risk_level.map(|r| r.to_string()).unwrap_or_default(),
            categories = ?event.categories,
            violations = ?event.violations,
            review_id = event.review_id.as_deref().unwrap_or("-"),
            "security event"
        );
        Ok(())
    }
}
