//! Tool execution context.

/// Context passed to every tool invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Agent that requested the call.
    pub agent_id: String,

    /// Correlation ID for tracing a single invocation.
    pub correlation_id: String,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            correlation_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}
