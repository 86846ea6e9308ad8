//! # Shield Limiter - Per-User Rate Limiting
//!
//! Fixed-window request throttling for the PromptShield pipeline. Every
//! request costs one unit against the calling user's window; once the window
//! maximum is reached, further requests are rejected until the window rolls
//! over.
//!
//! ## Limiter Shape
//!
//! This is a **fixed-window** limiter, not a sliding one: a user's counter
//! is replaced wholesale when its window expires. Two bursts can land close
//! together across a window boundary without being throttled - that is a
//! known tradeoff of the window shape, not a bug.
//!
//! ## Concurrency
//!
//! State is a map of per-user windows behind a `parking_lot::Mutex`; the
//! whole read-modify-write of a counter happens under the lock, so
//! concurrent requests from the same user can never under-count. The API
//! takes `&self` and the limiter is `Send + Sync`, so one instance can be
//! shared across tasks behind an `Arc`.
//!
//! State is in-memory only. Counters do not survive a process restart; a
//! multi-instance deployment needs a shared backing store with the same
//! per-key semantics.
//!
//! ## Usage
//!
//! ```rust
//! use shield_limiter::RateLimiter;
//!
//! let limiter = RateLimiter::new();
//! let decision = limiter.check("user-1");
//! assert!(decision.allowed);
//! assert_eq!(decision.remaining, 19);
//! ```

pub mod limiter;

pub use limiter::{RateLimitDecision, RateLimiter, RateLimiterConfig};
