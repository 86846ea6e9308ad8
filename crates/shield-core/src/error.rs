//! Error types for the secure pipeline.
//!
//! These are pipeline failures, not security outcomes. A blocked or
//! escalated request is a [`crate::PipelineVerdict::Denied`], never an
//! error; an error here means the request could not be processed at all.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by the model-executor collaborator.
#[derive(Debug, Error)]
#[error("model executor failed: {0}")]
pub struct ExecutorError(pub String);

/// Pipeline-level failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The model call failed. Never converted into a silent allow.
    #[error("model execution failed: {0}")]
    Execution(#[from] ExecutorError),

    /// The model call exceeded the configured timeout.
    #[error("model execution timed out after {0:?}")]
    ExecutionTimeout(Duration),

    /// Internal invariant violation. Surfaced without leaking detail to
    /// end users; callers must not interpret this as "request was unsafe".
    #[error("internal pipeline error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_error_propagates() {
        let err: PipelineError = ExecutorError("backend 503".to_string()).into();
        assert!(matches!(err, PipelineError::Execution(_)));
        assert!(err.to_string().contains("backend 503"));
    }

    #[test]
    fn test_timeout_display() {
        let err = PipelineError::ExecutionTimeout(Duration::from_secs(30));
        assert!(err.to_string().contains("timed out"));
    }
}
