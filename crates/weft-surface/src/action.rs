//! Declared-context resolution against the data model.
//!
//! Used on both sides of the wire: the client resolves at click time from
//! its local copy, and the router exposes the same function for agents that
//! want a server-side view.

use crate::PropValue;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;
use weft_state::{DataModelStore, Path};

/// A non-fatal resolution miss: the declared path had no value.
///
/// The action still proceeds with `null` for that entry — business
/// completeness is the agent's concern, not the router's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingPathWarning {
    /// Context key whose path missed.
    pub key: String,
    /// The path that resolved to nothing.
    pub path: Path,
}

/// Outcome of resolving a declared context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedContext {
    /// Concrete values, one per declared entry.
    pub values: Map<String, Value>,
    /// Paths that resolved to nothing.
    pub warnings: Vec<MissingPathWarning>,
}

/// Resolve each declared entry: path references read the data model
/// (missing paths become `null` plus a warning), literals pass through.
/// Never errors.
pub fn resolve_context(
    store: &DataModelStore,
    declared: &BTreeMap<String, PropValue>,
) -> ResolvedContext {
    let mut resolved = ResolvedContext::default();
    for (key, value) in declared {
        match value {
            PropValue::Literal(v) => {
                resolved.values.insert(key.clone(), v.clone());
            }
            PropValue::Path(path) => match store.get(path) {
                Some(v) => {
                    resolved.values.insert(key.clone(), v.clone());
                }
                None => {
                    warn!(key = %key, path = %path, "action context path missing; resolving to null");
                    resolved.values.insert(key.clone(), Value::Null);
                    resolved.warnings.push(MissingPathWarning {
                        key: key.clone(),
                        path: path.clone(),
                    });
                }
            },
        }
    }
    resolved
}
