//! Escalation queue and review lifecycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

use shield_filter::RiskLevel;

use crate::notify::{NotificationSink, SecurityEvent, SecurityEventKind};

/// HITL tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitlConfig {
    /// How long a pending review stays actionable. Default: 24 hours.
    /// Unresolved reviews past this age are treated as rejected and evicted
    /// on read.
    pub review_expiry: Duration,
}

impl Default for HitlConfig {
    fn default() -> Self {
        Self {
            review_expiry: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Approval state reported to callers polling a review.
///
/// `approved` is false for pending, unknown, and expired ids alike - the
/// absence of an approval is never distinguishable from a rejection by
/// design, so callers cannot probe the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalStatus {
    /// Whether an external reviewer approved the request.
    pub approved: bool,
    /// Reviewer who resolved it, if resolved.
    pub reviewer_id: Option<String>,
    /// When it was resolved, if resolved.
    pub timestamp: Option<SystemTime>,
    /// Reviewer notes, if any.
    pub notes: Option<String>,
}

impl ApprovalStatus {
    fn unapproved() -> Self {
        Self {
            approved: false,
            reviewer_id: None,
            timestamp: None,
            notes: None,
        }
    }
}

/// Errors from reviewer-side operations.
#[derive(Debug, Error)]
pub enum HitlError {
    /// The review id does not exist (or has already expired and been
    /// evicted).
    #[error("unknown review id: {0}")]
    UnknownReview(String),
}

/// A reviewer's recorded decision.
#[derive(Debug, Clone)]
struct Resolution {
    approved: bool,
    reviewer_id: String,
    timestamp: SystemTime,
    notes: Option<String>,
}

/// One escalated request.
#[derive(Debug, Clone)]
struct Review {
    input: String,
    submitted_at: SystemTime,
    risk_level: RiskLevel,
    resolution: Option<Resolution>,
}

/// Snapshot of a queued review, for reviewer tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// The review id callers poll with.
    pub review_id: String,
    /// The escalated input, verbatim.
    pub input: String,
    /// Risk level at submission time.
    pub risk_level: RiskLevel,
    /// When the review was queued.
    pub submitted_at: SystemTime,
    /// Whether a reviewer has already recorded a decision.
    pub resolved: bool,
}

/// The HITL controller.
///
/// Owns the pending-review map exclusively; shared across tasks via `&self`
/// with the map behind a mutex, mirroring the limiter's concurrency story.
pub struct HitlController {
    config: HitlConfig,
    reviews: Mutex<HashMap<String, Review>>,
    notifier: Arc<dyn NotificationSink>,
    /// Monotonic discriminator folded into review ids so identical
    /// submissions in the same clock tick still get distinct ids.
    sequence: AtomicU64,
}

impl HitlController {
    /// Controller with the given config and notification sink.
    pub fn new(config: HitlConfig, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            config,
            reviews: Mutex::new(HashMap::new()),
            notifier,
            sequence: AtomicU64::new(0),
        }
    }

    /// Whether this risk level must go through a human.
    ///
    /// Mirrors the filter's own review flag today; kept as a separate
    /// decision point so escalation policy can diverge from detection.
    pub fn requires_approval(&self, risk_level: RiskLevel) -> bool {
        risk_level.requires_review()
    }

    /// Queue a request for human review and alert the security team.
    ///
    /// Returns the review id (`review_` + 16 hex chars). Ids are unique per
    /// submission even for identical input/user pairs.
    pub fn submit_for_review(&self, input: &str, risk_level: RiskLevel, user_id: &str) -> String {
        self.submit_for_review_at(input, risk_level, user_id, SystemTime::now())
    }

    pub(crate) fn submit_for_review_at(
        &self,
        input: &str,
        risk_level: RiskLevel,
        user_id: &str,
        now: SystemTime,
    ) -> String {
        let review_id = self.generate_review_id(input, user_id, now);

        self.reviews.lock().insert(
            review_id.clone(),
            Review {
                input: input.to_string(),
                submitted_at: now,
                risk_level,
                resolution: None,
            },
        );

        info!(
            review_id,
            user_id,
            %risk_level,
            input_len = input.len(),
            "HITL review requested"
        );

        let event = SecurityEvent::new(SecurityEventKind::ReviewRequested)
            .user(user_id)
            .risk(risk_level)
            .review(&review_id);
        if let Err(err) = self.notifier.notify(event) {
            warn!(review_id, %err, "failed to send security notification");
        }

        review_id
    }

    /// Current approval state for a review id.
    ///
    /// Unknown ids read as unapproved. Unresolved reviews past expiry are
    /// evicted here and also read as unapproved; a recorded resolution
    /// never expires and stays readable.
    pub fn approval_status(&self, review_id: &str) -> ApprovalStatus {
        self.approval_status_at(review_id, SystemTime::now())
    }

    pub(crate) fn approval_status_at(&self, review_id: &str, now: SystemTime) -> ApprovalStatus {
        let mut reviews = self.reviews.lock();

        let Some(review) = reviews.get(review_id) else {
            return ApprovalStatus::unapproved();
        };

        if let Some(res) = &review.resolution {
            return ApprovalStatus {
                approved: res.approved,
                reviewer_id: Some(res.reviewer_id.clone()),
                timestamp: Some(res.timestamp),
                notes: res.notes.clone(),
            };
        }

        let age = now
            .duration_since(review.submitted_at)
            .unwrap_or(Duration::ZERO);
        if age > self.config.review_expiry {
            reviews.remove(review_id);
            info!(review_id, "expired HITL review evicted");
        }

        ApprovalStatus::unapproved()
    }

    /// Record an external reviewer's decision on a pending review.
    ///
    /// This is the only path to `approved = true`; nothing in this
    /// component approves automatically.
    ///
    /// # Errors
    ///
    /// [`HitlError::UnknownReview`] if the id was never issued or the
    /// review expired unresolved.
    pub fn resolve_review(
        &self,
        review_id: &str,
        reviewer_id: &str,
        approved: bool,
        notes: Option<String>,
    ) -> Result<(), HitlError> {
        self.resolve_review_at(review_id, reviewer_id, approved, notes, SystemTime::now())
    }

    pub(crate) fn resolve_review_at(
        &self,
        review_id: &str,
        reviewer_id: &str,
        approved: bool,
        notes: Option<String>,
        now: SystemTime,
    ) -> Result<(), HitlError> {
        let mut reviews = self.reviews.lock();

        let review = reviews
            .get_mut(review_id)
            .ok_or_else(|| HitlError::UnknownReview(review_id.to_string()))?;

        // Only unresolved reviews age out; a resolved one may be amended.
        if review.resolution.is_none() {
            let age = now
                .duration_since(review.submitted_at)
                .unwrap_or(Duration::ZERO);
            if age > self.config.review_expiry {
                reviews.remove(review_id);
                return Err(HitlError::UnknownReview(review_id.to_string()));
            }
        }

        review.resolution = Some(Resolution {
            approved,
            reviewer_id: reviewer_id.to_string(),
            timestamp: now,
            notes,
        });

        info!(review_id, reviewer_id, approved, "HITL review resolved");
        Ok(())
    }

    /// Number of reviews currently held, resolved or not.
    pub fn pending_count(&self) -> usize {
        self.reviews.lock().len()
    }

    /// Snapshot of the queue for reviewer tooling, oldest first.
    pub fn pending_reviews(&self) -> Vec<ReviewSummary> {
        let reviews = self.reviews.lock();
        let mut summaries: Vec<ReviewSummary> = reviews
            .iter()
            .map(|(id, review)| ReviewSummary {
                review_id: id.clone(),
                input: review.input.clone(),
                risk_level: review.risk_level,
                submitted_at: review.submitted_at,
                resolved: review.resolution.is_some(),
            })
            .collect();
        summaries.sort_by_key(|s| s.submitted_at);
        summaries
    }

    /// Derive `review_<16 hex>` from the submission content, the wall
    /// clock, and a per-instance counter.
    fn generate_review_id(&self, input: &str, user_id: &str, now: SystemTime) -> String {
        let nanos = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hasher.update(user_id.as_bytes());
        hasher.update(nanos.to_le_bytes());
        hasher.update(seq.to_le_bytes());
        let digest = hasher.finalize();

        let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
        format!("review_{}", hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{LogSink, NotifyError};
    use parking_lot::Mutex as PlMutex;

    fn controller() -> HitlController {
        HitlController::new(HitlConfig::default(), Arc::new(LogSink))
    }

    /// Sink that records every event it receives.
    struct RecordingSink {
        events: PlMutex<Vec<SecurityEvent>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                events: PlMutex::new(Vec::new()),
            }
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, event: SecurityEvent) -> Result<(), NotifyError> {
            self.events.lock().push(event);
            Ok(())
        }
    }

    /// Sink that always fails delivery.
    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn notify(&self, _event: SecurityEvent) -> Result<(), NotifyError> {
            Err(NotifyError("smtp unreachable".to_string()))
        }
    }

    #[test]
    fn test_requires_approval_mapping() {
        let hitl = controller();
        assert!(!hitl.requires_approval(RiskLevel::Safe));
        assert!(!hitl.requires_approval(RiskLevel::Low));
        assert!(!hitl.requires_approval(RiskLevel::Medium));
        assert!(hitl.requires_approval(RiskLevel::High));
        assert!(hitl.requires_approval(RiskLevel::Critical));
    }

    #[test]
    fn test_review_id_shape() {
        let hitl = controller();
        let id = hitl.submit_for_review("bad input", RiskLevel::High, "user-1");

        assert!(id.starts_with("review_"));
        let hex = &id["review_".len()..];
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_review_ids_unique_for_identical_submissions() {
        let hitl = controller();
        let mut seen = std::collections::HashSet::new();

        for _ in 0..1000 {
            let id = hitl.submit_for_review("same input", RiskLevel::High, "same-user");
            assert!(seen.insert(id), "duplicate review id issued");
        }
        assert_eq!(hitl.pending_count(), 1000);
    }

    #[test]
    fn test_unknown_review_unapproved() {
        let hitl = controller();
        let status = hitl.approval_status("review_0000000000000000");
        assert!(!status.approved);
        assert!(status.reviewer_id.is_none());
    }

    #[test]
    fn test_pending_review_unapproved() {
        let hitl = controller();
        let id = hitl.submit_for_review("input", RiskLevel::High, "user-1");
        assert!(!hitl.approval_status(&id).approved);
    }

    #[test]
    fn test_expired_review_evicted_on_read() {
        let hitl = controller();
        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        let later = submitted + Duration::from_secs(25 * 60 * 60);
        let status = hitl.approval_status_at(&id, later);
        assert!(!status.approved);
        assert_eq!(hitl.pending_count(), 0);
    }

    #[test]
    fn test_unexpired_review_survives_read() {
        let hitl = controller();
        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        let later = submitted + Duration::from_secs(23 * 60 * 60);
        hitl.approval_status_at(&id, later);
        assert_eq!(hitl.pending_count(), 1);
    }

    #[test]
    fn test_resolve_approves() {
        let hitl = controller();
        let id = hitl.submit_for_review("input", RiskLevel::High, "user-1");

        hitl.resolve_review(&id, "reviewer-7", true, Some("looks benign".to_string()))
            .unwrap();

        let status = hitl.approval_status(&id);
        assert!(status.approved);
        assert_eq!(status.reviewer_id.as_deref(), Some("reviewer-7"));
        assert_eq!(status.notes.as_deref(), Some("looks benign"));
        assert!(status.timestamp.is_some());
    }

    #[test]
    fn test_resolve_rejects() {
        let hitl = controller();
        let id = hitl.submit_for_review("input", RiskLevel::High, "user-1");

        hitl.resolve_review(&id, "reviewer-7", false, None).unwrap();

        let status = hitl.approval_status(&id);
        assert!(!status.approved);
        assert_eq!(status.reviewer_id.as_deref(), Some("reviewer-7"));
    }

    #[test]
    fn test_resolved_review_survives_expiry() {
        let hitl = controller();
        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        hitl.resolve_review_at(
            &id,
            "reviewer-7",
            true,
            None,
            submitted + Duration::from_secs(60 * 60),
        )
        .unwrap();

        // A recorded approval is never discarded by the expiry policy
        let status = hitl.approval_status_at(&id, submitted + Duration::from_secs(25 * 60 * 60));
        assert!(status.approved);
        assert_eq!(status.reviewer_id.as_deref(), Some("reviewer-7"));
        assert_eq!(hitl.pending_count(), 1);
    }

    #[test]
    fn test_resolved_review_amendable_past_expiry() {
        let hitl = controller();
        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        hitl.resolve_review_at(&id, "reviewer-7", true, None, submitted + Duration::from_secs(60))
            .unwrap();
        hitl.resolve_review_at(
            &id,
            "reviewer-8",
            false,
            Some("revoked".to_string()),
            submitted + Duration::from_secs(25 * 60 * 60),
        )
        .unwrap();

        let status = hitl.approval_status_at(&id, submitted + Duration::from_secs(26 * 60 * 60));
        assert!(!status.approved);
        assert_eq!(status.reviewer_id.as_deref(), Some("reviewer-8"));
    }

    #[test]
    fn test_resolve_unknown_review_errors() {
        let hitl = controller();
        let err = hitl
            .resolve_review("review_ffffffffffffffff", "reviewer-7", true, None)
            .unwrap_err();
        assert!(matches!(err, HitlError::UnknownReview(_)));
    }

    #[test]
    fn test_resolve_expired_review_errors() {
        let hitl = controller();
        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        let later = submitted + Duration::from_secs(25 * 60 * 60);
        let err = hitl
            .resolve_review_at(&id, "reviewer-7", true, None, later)
            .unwrap_err();
        assert!(matches!(err, HitlError::UnknownReview(_)));
    }

    #[test]
    fn test_submission_notifies_security_team() {
        let sink = Arc::new(RecordingSink::new());
        let sink_dyn: Arc<dyn NotificationSink> = sink.clone();
        let hitl = HitlController::new(HitlConfig::default(), sink_dyn);

        let id = hitl.submit_for_review("input", RiskLevel::High, "user-1");

        let events = sink.events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SecurityEventKind::ReviewRequested);
        assert_eq!(events[0].review_id.as_deref(), Some(id.as_str()));
        assert_eq!(events[0].user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_sink_failure_does_not_block_submission() {
        let hitl = HitlController::new(HitlConfig::default(), Arc::new(FailingSink));
        let id = hitl.submit_for_review("input", RiskLevel::High, "user-1");
        assert!(id.starts_with("review_"));
        assert_eq!(hitl.pending_count(), 1);
    }

    #[test]
    fn test_pending_reviews_snapshot() {
        let hitl = controller();
        let base = SystemTime::now();
        let first = hitl.submit_for_review_at("older", RiskLevel::High, "user-1", base);
        let second = hitl.submit_for_review_at(
            "newer",
            RiskLevel::Critical,
            "user-2",
            base + Duration::from_secs(5),
        );
        hitl.resolve_review(&second, "reviewer-1", false, None).unwrap();

        let summaries = hitl.pending_reviews();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].review_id, first);
        assert_eq!(summaries[0].input, "older");
        assert!(!summaries[0].resolved);
        assert_eq!(summaries[1].review_id, second);
        assert!(summaries[1].resolved);
    }

    #[test]
    fn test_custom_expiry() {
        let hitl = HitlController::new(
            HitlConfig {
                review_expiry: Duration::from_secs(60),
            },
            Arc::new(LogSink),
        );

        let submitted = SystemTime::now();
        let id = hitl.submit_for_review_at("input", RiskLevel::High, "user-1", submitted);

        let status = hitl.approval_status_at(&id, submitted + Duration::from_secs(61));
        assert!(!status.approved);
        assert_eq!(hitl.pending_count(), 0);
    }
}
