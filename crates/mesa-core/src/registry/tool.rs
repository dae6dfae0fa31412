//! Tool registry for declaring and dispatching tools.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use mesa_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use super::base::{BaseRegistry, Registerable};
use crate::error::RegistryError;

impl Registerable for dyn Tool {
    fn registry_id(&self) -> &str {
        &self.definition().name
    }
}

/// Static name to handler table.
///
/// Dispatch never fails: unknown names, invalid arguments, timeouts and
/// tool errors all come back as a JSON payload the model can read.
pub struct ToolRegistry {
    inner: BaseRegistry<dyn Tool>,
    timeout: Option<Duration>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
            timeout: None,
        }
    }

    /// Bound every invocation by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Register a tool.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        self.inner.register(tool)
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Definitions of every registered tool, in registration order.
    pub fn declare(&self) -> Vec<ToolDefinition> {
        self.inner
            .values()
            .iter()
            .map(|t| t.definition().clone())
            .collect()
    }

    /// A registry restricted to `names`, sharing the same handlers.
    ///
    /// Unknown names are skipped with a warning.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> ToolRegistry {
        let subset = ToolRegistry {
            inner: BaseRegistry::new(),
            timeout: self.timeout,
        };
        for name in names {
            let name = name.as_ref();
            match self.get(name) {
                Some(tool) => {
                    // Duplicates in `names` are harmless.
                    let _ = subset.register(tool);
                }
                None => warn!("Tool subset references unknown tool: {}", name),
            }
        }
        subset
    }

    /// Invoke `name` with `arguments` and return the result mapping.
    pub async fn invoke(&self, name: &str, arguments: Value, ctx: ToolContext) -> Value {
        let Some(tool) = self.get(name) else {
            warn!("Tool not found: {}", name);
            return json!({ "error": format!("{} not found", name) });
        };

        let arguments = if arguments.is_null() {
            json!({})
        } else {
            arguments
        };

        if let Err(e) = tool.validate(&arguments) {
            warn!("Rejected arguments for {}: {}", name, e);
            return ToolResult::error(e.to_string()).into_value();
        }

        info!(
            "Invoking tool {} for agent {} (correlation_id={})",
            name, ctx.agent_id, ctx.correlation_id
        );
        debug!("Tool {} arguments: {}", name, arguments);

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, tool.execute(arguments, ctx)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("Tool {} timed out after {:?}", name, limit);
                    return ToolResult::error(format!(
                        "timed out after {} seconds",
                        limit.as_secs()
                    ))
                    .into_value();
                }
            },
            None => tool.execute(arguments, ctx).await,
        };

        match outcome {
            Ok(result) => {
                if !result.success {
                    debug!("Tool {} reported failure: {:?}", name, result.error);
                }
                result.into_value()
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolResult::error(e.to_string()).into_value()
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
