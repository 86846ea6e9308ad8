//! # Shield HITL - Human-in-the-Loop Escalation
//!
//! When the Injection Filter flags a request as high risk but not certain
//! enough to hard-block, a human makes the call. This crate owns that
//! escalation path: a pending-review queue keyed by content-derived review
//! ids, an expiry policy that treats stale unresolved reviews as rejected, and the
//! resolve operation an external reviewer uses to record a decision.
//!
//! ## Review Lifecycle
//!
//! ```text
//! submit_for_review ──▶ pending ──▶ resolve_review ──▶ approved / rejected
//!                          │
//!                          └─▶ expired (unresolved > 24 h, evicted on read, reads as rejected)
//! ```
//!
//! There is no automatic approval path. A review only becomes approved when
//! an external reviewer calls [`HitlController::resolve_review`]; everything
//! else - unknown ids, pending reviews, expired reviews - reads as
//! unapproved.
//!
//! ## Notifications
//!
//! Escalations are security events. The [`NotificationSink`] trait is the
//! single interface behind which email/Slack/PagerDuty/webhook delivery
//! lives; all delivery is fire-and-forget, and a sink failure is logged and
//! swallowed, never surfaced to the requester.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use shield_filter::RiskLevel;
//! use shield_hitl::{HitlController, LogSink};
//!
//! let hitl = HitlController::new(Default::default(), Arc::new(LogSink));
//!
//! let review_id = hitl.submit_for_review("suspicious input", RiskLevel::High, "user-1");
//! assert!(review_id.starts_with("review_"));
//! assert!(!hitl.approval_status(&review_id).approved);
//! ```

pub mod controller;
pub mod notify;

pub use controller::{ApprovalStatus, HitlConfig, HitlController, HitlError, ReviewSummary};
pub use notify::{LogSink, NotificationSink, NotifyError, SecurityEvent, SecurityEventKind};
