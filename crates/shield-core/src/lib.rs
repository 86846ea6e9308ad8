//! # PromptShield Core
//!
//! Layered prompt-injection defense sitting between an end user and an LLM
//! backend. The [`SecurePipeline`] facade sequences four independent
//! security components around the actual model call.
//!
//! ## Security Layers
//!
//! | Layer | Component | Threats addressed |
//! |-------|-----------|-------------------|
//! | Quota | Rate Limiter | Abuse, retry storms |
//! | Input | Injection Filter | Overrides, jailbreaks, extraction |
//! | Escalation | HITL Controller | High-risk requests needing a human |
//! | Output | Output Validator | PII, credentials, prompt leakage |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      SECURE PIPELINE                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  request ─▶ rate limit ─▶ injection filter ─┬─▶ [DENY]       │
//! │                                             │                │
//! │                        critical: block ◀────┤                │
//! │                        high: escalate ◀─────┤                │
//! │                        detected: sanitize ◀─┘                │
//! │                                             │                │
//! │             isolated prompt ─▶ model call (timed)            │
//! │                                             │                │
//! │             output validator ─▶ redact ─▶ [ALLOW]            │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decision Model
//!
//! Security denials (rate limit, critical block, escalation) are ordinary
//! [`PipelineVerdict::Denied`] values with a user-displayable reason - never
//! errors. Errors ([`PipelineError`]) mean the pipeline itself failed:
//! model-executor failure or timeout. Callers must not confuse the two.
//!
//! The only suspension point is the model call, wrapped in a timeout. All
//! four leaf components are synchronous and non-blocking.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shield_core::{SecurePipeline, ShieldConfig};
//! use shield_hitl::LogSink;
//!
//! let pipeline = SecurePipeline::new(ShieldConfig::default(), executor, Arc::new(LogSink));
//!
//! let verdict = pipeline
//!     .process_request("What is the weather?", system_prompt, "user-1")
//!     .await?;
//!
//! if let Some(response) = verdict.response() {
//!     println!("{}", response);
//! }
//! ```

mod config;
mod error;
mod executor;
mod pipeline;
mod prompt;
mod verdict;

pub use config::ShieldConfig;
pub use error::{ExecutorError, PipelineError};
pub use executor::ModelExecutor;
pub use pipeline::SecurePipeline;
pub use prompt::build_isolated_prompt;
pub use verdict::{DenyReason, PipelineVerdict};

// Re-export component types for convenience
pub use shield_filter::{DetectionResult, FilterConfig, InjectionFilter, RiskLevel};
pub use shield_hitl::{
    ApprovalStatus, HitlConfig, HitlController, LogSink, NotificationSink, SecurityEvent,
    SecurityEventKind,
};
pub use shield_limiter::{RateLimitDecision, RateLimiter, RateLimiterConfig};
pub use shield_output::{OutputValidator, ValidationResult};

/// Core result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
