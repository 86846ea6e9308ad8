//! Core types for the Injection Filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk level assigned to an analyzed input.
///
/// Levels are ordered: `Safe < Low < Medium < High < Critical`. The ordering
/// matters for escalation policy - anything at [`RiskLevel::High`] or above
/// requires human review, and [`RiskLevel::Critical`] is hard-blocked by the
/// pipeline regardless of review policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No injection signatures matched.
    #[default]
    Safe,
    /// Weak signal, below the sanitization threshold.
    Low,
    /// Moderate signal. Input is sanitized and allowed to continue.
    Medium,
    /// Strong signal. Requires human review before execution.
    High,
    /// Near-certain attack. Hard-blocked, never executed.
    Critical,
}

impl RiskLevel {
    /// Whether this level requires a human in the loop.
    ///
    /// True for [`RiskLevel::High`] and [`RiskLevel::Critical`] only.
    pub fn requires_review(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// Result of analyzing one input string.
///
/// Constructed fresh per [`crate::InjectionFilter::detect`] call; immutable
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Whether any pattern category matched.
    pub detected: bool,

    /// Risk level derived from `confidence`.
    pub risk_level: RiskLevel,

    /// Names of matched categories, deduplicated, in first-match order.
    pub categories: Vec<String>,

    /// Final confidence score in `[0.0, 1.0]`.
    pub confidence: f64,

    /// Whether the risk level mandates human review.
    pub requires_human_review: bool,

    /// Best-effort cleaned input. Present iff `detected`.
    pub sanitized_input: Option<String>,
}

impl DetectionResult {
    /// A result for input that matched nothing.
    pub fn safe() -> Self {
        Self {
            detected: false,
            risk_level: RiskLevel::Safe,
            categories: Vec::new(),
            confidence: 0.0,
            requires_human_review: false,
            sanitized_input: None,
        }
    }
}

/// Errors from filter construction.
///
/// Detection itself is total and never errors; these only arise when a
/// caller registers custom pattern categories.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A signature in a custom category failed to compile.
    #[error("invalid pattern in category '{category}': {source}")]
    InvalidPattern {
        /// Category being registered.
        category: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Severity weight outside the `[0.0, 1.0]` range.
    #[error("invalid weight {weight} for category '{category}': must be in [0.0, 1.0]")]
    InvalidWeight {
        /// Category being registered.
        category: String,
        /// Rejected weight.
        weight: f64,
    },
}
