//! Verdict types for pipeline outcomes.

use serde::{Deserialize, Serialize};

/// The pipeline's answer for one request.
///
/// Denials are expected outcomes, not errors: they always carry a
/// non-technical, user-displayable reason, and an escalation additionally
/// carries the review id the caller polls with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineVerdict {
    /// Request passed all layers. The response may have been redacted by
    /// the output validator.
    Allowed {
        /// Response text to return to the user.
        response: String,
    },

    /// Request was denied by a security layer.
    Denied {
        /// Why, in user-displayable terms.
        reason: DenyReason,
        /// Set iff the request was escalated for human review.
        review_id: Option<String>,
    },
}

impl PipelineVerdict {
    /// Build an Allowed verdict.
    pub fn allowed(response: String) -> Self {
        Self::Allowed { response }
    }

    /// Build a Denied verdict without an escalation.
    pub fn denied(reason: DenyReason) -> Self {
        Self::Denied {
            reason,
            review_id: None,
        }
    }

    /// Build a Denied verdict for an escalated request.
    pub fn escalated(reason: DenyReason, review_id: String) -> Self {
        Self::Denied {
            reason,
            review_id: Some(review_id),
        }
    }

    /// Whether the request was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Response text, if allowed.
    pub fn response(&self) -> Option<&str> {
        match self {
            Self::Allowed { response } => Some(response),
            Self::Denied { .. } => None,
        }
    }

    /// Review id, if this denial was an escalation.
    pub fn review_id(&self) -> Option<&str> {
        match self {
            Self::Denied { review_id, .. } => review_id.as_deref(),
            Self::Allowed { .. } => None,
        }
    }

    /// Displayable denial reason, if denied.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Denied { reason, .. } => Some(reason.to_string()),
            Self::Allowed { .. } => None,
        }
    }
}

/// Why a request was denied.
///
/// `Display` renders the exact strings shown to end users; keep them
/// non-technical and free of internal detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DenyReason {
    /// The user exhausted their request quota.
    RateLimited {
        /// Seconds until the window resets.
        retry_after_secs: u64,
    },

    /// The input was classified as a near-certain attack.
    HarmfulContent,

    /// The input was escalated to the security team.
    UnderReview,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited { retry_after_secs } => {
                write!(
                    f,
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_after_secs
                )
            }
            Self::HarmfulContent => {
                write!(
                    f,
                    "Your request contains potentially harmful content and has been blocked."
                )
            }
            Self::UnderReview => {
                write!(f, "Your request has been submitted for security review.")
            }
        }
    }
}
