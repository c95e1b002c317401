//! Component tool registry and generator bridge.
//!
//! Tools are named, schema-described component factories exposed to the LLM
//! through its function-calling interface. Arguments coming back from the
//! model are validated against the tool's JSON Schema before any generator
//! runs — LLM-supplied input is never trusted blindly. Generators are pure:
//! validated arguments plus an injected id generator deterministically
//! produce a component tree and its initial data patch.

mod catalog;
mod descriptor;
mod generator;
mod idgen;
mod registry;

pub use catalog::{
    default_registry, CreateBarChart, CreateButton, CreateCheckBox, CreateForm, CreateText,
    CreateTextField,
};
pub use descriptor::{validate_against_schema, ToolDescriptor, ToolError};
pub use generator::{ComponentGenerator, GeneratedUi, TypedGenerator};
pub use idgen::{IdGen, SeqIdGen, UuidIdGen};
pub use registry::GeneratorRegistry;
