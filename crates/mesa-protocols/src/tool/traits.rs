//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;

/// Core trait for tools.
///
/// A tool performs one remote action on behalf of an agent. Remote failures
/// should come back as [`ToolResult::error`]; a `ToolError` is reserved for
/// calls that could not be attempted at all.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition.
    fn definition(&self) -> &ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    /// Validate the arguments before execution.
    fn validate(&self, params: &serde_json::Value) -> Result<(), ToolError> {
        let definition = self.definition();
        if definition.parameters_schema.is_none() {
            return Ok(());
        }
        let Some(object) = params.as_object() else {
            return Err(ToolError::ValidationFailed(
                "Parameters must be an object".to_string(),
            ));
        };
        for name in definition.required_parameters() {
            if object.get(name).is_none_or(|v| v.is_null()) {
                return Err(ToolError::InvalidParameters(format!(
                    "missing required parameter '{}'",
                    name
                )));
            }
        }
        Ok(())
    }
}
