//! Agent errors.

use thiserror::Error;

use super::ProviderError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(String),

    #[error("Agent execution failed: {0}")]
    ExecutionFailed(String),

    #[error("tool-call loop exceeded ({0} rounds)")]
    ToolLoopExceeded(u32),

    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),
}
