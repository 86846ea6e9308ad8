//! Model-executor collaborator contract.

use async_trait::async_trait;

use crate::error::ExecutorError;

/// The opaque LLM backend.
///
/// The pipeline hands it a fully isolated prompt and expects raw response
/// text back. Retry policy, the model's wire protocol, and streaming all
/// belong to the implementation; the pipeline only adds a timeout around
/// the call.
#[async_trait]
pub trait ModelExecutor: Send + Sync {
    /// Execute one prompt. This is the pipeline's sole suspension point.
    async fn execute(&self, prompt: &str) -> Result<String, ExecutorError>;
}
