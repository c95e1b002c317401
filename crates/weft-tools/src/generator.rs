//! Generator traits and their output shape.

use crate::{validate_against_schema, IdGen, ToolDescriptor, ToolError};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use weft_state::Patch;
use weft_surface::Component;

/// The output of one generator invocation: a freshly built component tree
/// plus the initial data patch that seeds its two-way-bound fields.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedUi {
    /// Id of the root component.
    pub root_id: String,
    /// All produced components, root and descendants, in upsert order.
    pub components: Vec<Component>,
    /// Initial data model operations for bound fields.
    pub data_patch: Patch,
}

impl GeneratedUi {
    /// Build from a single root component with no children.
    pub fn single(component: Component, data_patch: Patch) -> Self {
        Self {
            root_id: component.id.clone(),
            components: vec![component],
            data_patch,
        }
    }
}

/// A named, schema-described component factory.
///
/// Generators are pure: given validated arguments and an id generator, the
/// same inputs always yield structurally identical output, ids included.
pub trait ComponentGenerator: Send + Sync {
    /// The tool descriptor exposed to the LLM.
    fn descriptor(&self) -> ToolDescriptor;

    /// Validate raw arguments before generation. The default checks against
    /// the descriptor's JSON Schema.
    fn validate_args(&self, args: &Value) -> Result<(), ToolError> {
        validate_against_schema(&self.descriptor().parameters, args)
    }

    /// Produce the component tree and initial data patch.
    fn generate(&self, args: Value, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError>;
}

/// Strongly-typed generator with automatic schema derivation.
///
/// Implement this instead of [`ComponentGenerator`] when the argument shape
/// is fixed; a blanket impl provides the dynamic trait. Deserialization
/// doubles as validation, so the JSON Schema pass is skipped.
pub trait TypedGenerator: Send + Sync {
    /// Argument type — must derive `Deserialize` and `JsonSchema`.
    type Args: for<'de> Deserialize<'de> + JsonSchema;

    /// Unique tool name (snake_case).
    fn tool_name(&self) -> &str;

    /// Description shown to the LLM.
    fn description(&self) -> &str;

    /// Build the UI from typed arguments.
    fn build(&self, args: Self::Args, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError>;
}

impl<T: TypedGenerator> ComponentGenerator for T {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.tool_name(), self.description())
            .with_parameters(typed_schema::<T::Args>())
    }

    /// `from_value` deserialization covers validation.
    fn validate_args(&self, _args: &Value) -> Result<(), ToolError> {
        Ok(())
    }

    fn generate(&self, args: Value, ids: &dyn IdGen) -> Result<GeneratedUi, ToolError> {
        let typed: T::Args = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
        self.build(typed, ids)
    }
}

/// Derive a JSON Schema value for a typed argument struct, with the
/// `$schema` key stripped — LLM providers don't need it.
fn typed_schema<T: JsonSchema>() -> Value {
    let mut v = serde_json::to_value(schemars::schema_for!(T))
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}));
    if let Some(obj) = v.as_object_mut() {
        obj.remove("$schema");
    }
    v
}
