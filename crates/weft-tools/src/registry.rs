//! The generator registry.

use crate::{ComponentGenerator, GeneratedUi, IdGen, ToolDescriptor, ToolError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Named set of component generators.
///
/// Constructed once at process start and passed by reference wherever tools
/// are needed — registration ergonomics without hidden global state.
/// Iteration order is the tool name order, so the schema list handed to the
/// LLM is stable across runs.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, Arc<dyn ComponentGenerator>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under its descriptor name. A later registration
    /// with the same name replaces the earlier one.
    pub fn register(&mut self, generator: Arc<dyn ComponentGenerator>) {
        let name = generator.descriptor().name;
        debug!(tool = %name, "registering component generator");
        self.generators.insert(name, generator);
    }

    /// Register a generator (builder).
    pub fn with(mut self, generator: Arc<dyn ComponentGenerator>) -> Self {
        self.register(generator);
        self
    }

    /// Descriptors of every registered tool, in name order.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.generators.values().map(|g| g.descriptor()).collect()
    }

    /// Function-calling schemas of every registered tool, in name order —
    /// fed verbatim to the LLM.
    pub fn function_schemas(&self) -> Vec<Value> {
        self.generators
            .values()
            .map(|g| g.descriptor().to_function_schema())
            .collect()
    }

    /// True when a tool of this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// True when no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Validate arguments and run the named generator.
    ///
    /// Fails with [`ToolError::UnknownTool`] for unregistered names and
    /// [`ToolError::InvalidArguments`] before the generator ever sees a
    /// malformed payload.
    pub fn invoke(
        &self,
        name: &str,
        args: Value,
        ids: &dyn IdGen,
    ) -> Result<GeneratedUi, ToolError> {
        let generator = self
            .generators
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_owned(),
            })?;
        generator.validate_args(&args)?;
        generator.generate(args, ids)
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("tools", &self.generators.keys().collect::<Vec<_>>())
            .finish()
    }
}
