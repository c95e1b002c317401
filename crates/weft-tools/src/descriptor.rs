//! Tool descriptors and argument validation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors raised by the tool registry and generators.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool name is not registered (a hallucinated call).
    #[error("unknown tool: {name}")]
    UnknownTool {
        /// The unrecognized name.
        name: String,
    },

    /// Arguments failed schema validation or deserialization.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The generator itself misbehaved.
    #[error("internal tool error: {0}")]
    Internal(String),
}

/// Metadata describing one component tool.
///
/// Descriptors are stable for the lifetime of the registry; the schema they
/// carry is handed verbatim to the LLM's function-calling interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool name (snake_case).
    pub name: String,
    /// Description shown to the LLM.
    pub description: String,
    /// JSON Schema for the arguments object.
    pub parameters: Value,
}

impl ToolDescriptor {
    /// Create a descriptor with an empty-object schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    /// Set the argument schema (builder).
    pub fn with_parameters(mut self, schema: Value) -> Self {
        self.parameters = schema;
        self
    }

    /// Render the standard function-calling shape:
    /// `{"type": "function", "function": {name, description, parameters}}`.
    pub fn to_function_schema(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Validate a JSON value against a JSON Schema.
///
/// Returns `Err(ToolError::InvalidArguments)` listing every violation, or
/// `Err(ToolError::Internal)` when the schema itself is malformed.
pub fn validate_against_schema(schema: &Value, args: &Value) -> Result<(), ToolError> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|e| ToolError::Internal(format!("invalid tool schema: {e}")))?;
    if validator.is_valid(args) {
        return Ok(());
    }
    let errors: Vec<String> = validator.iter_errors(args).map(|e| e.to_string()).collect();
    Err(ToolError::InvalidArguments(errors.join("; ")))
}
