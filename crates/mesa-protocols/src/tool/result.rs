//! Tool execution result types.

use serde_json::{Map, Value};

/// Normalized outcome of a tool call.
///
/// Serializes to the flat mapping fed back to the model:
/// `{"success": bool, ...fields, "error"?: text}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Whether the remote call succeeded.
    pub success: bool,

    /// Result fields alongside `success`.
    pub fields: Map<String, Value>,

    /// Error message if the call failed.
    pub error: Option<String>,
}

impl ToolResult {
    /// Create an empty successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            fields: Map::new(),
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            fields: Map::new(),
            error: Some(error.into()),
        }
    }

    /// Add a field to the result.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convert into the JSON mapping returned by the registry.
    pub fn into_value(self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 2);
        map.insert("success".to_string(), Value::Bool(self.success));
        map.extend(self.fields);
        if let Some(error) = self.error {
            map.insert("error".to_string(), Value::String(error));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
