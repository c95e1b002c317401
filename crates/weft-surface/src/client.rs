//! Client-side surface state: a local data model copy and its reducer.
//!
//! The client holds a *copy* of the data model, not a live reference to
//! server state. UI input events become typed commands applied by a single
//! reducer — the rendering layer never touches protocol types. `SetPath` is
//! a purely local, synchronous mutation (a keystroke or toggle costs no
//! network round-trip); `FireAction` resolves the declared context from the
//! local copy at fire time and yields the payload for a `userAction`
//! round-trip.

use crate::{resolve_context, Component, ResolvedContext};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use weft_state::{DataModelStore, PatchError, PatchOp, Path};

/// Errors raised by the client reducer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// A command referenced a component the client has never seen.
    #[error("unknown component: {id}")]
    UnknownComponent {
        /// The missing component id.
        id: String,
    },

    /// The local data model rejected a binding write.
    #[error("local data model rejected write: {0}")]
    Patch(#[from] PatchError),
}

/// A typed local command produced from a UI input event.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientCommand {
    /// Two-way-binding write: set a data model path to a value.
    SetPath {
        /// Target path.
        path: Path,
        /// New value.
        value: Value,
    },
    /// Fire the action declared on a component.
    FireAction {
        /// Id of the component the event originated from.
        source_component_id: String,
    },
}

/// An action resolved and ready to leave the client.
///
/// The context snapshot was taken from the local copy at fire time; the
/// server consumes it verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredAction {
    /// Declared action name.
    pub name: String,
    /// Originating component id.
    pub source_component_id: String,
    /// Fully resolved context values.
    pub context: serde_json::Map<String, Value>,
    /// Non-fatal resolution misses.
    pub warnings: Vec<crate::MissingPathWarning>,
}

/// The client's view of one surface: component descriptions for lookup and
/// the local data model copy.
#[derive(Debug, Default)]
pub struct ClientSurface {
    components: BTreeMap<String, Component>,
    data: DataModelStore,
}

impl ClientSurface {
    /// Create an empty client surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the local data model with a server-pushed snapshot.
    pub fn load_snapshot(&mut self, snapshot: Value) {
        self.data = DataModelStore::new(snapshot);
    }

    /// Record server-pushed component descriptions.
    pub fn upsert_components(&mut self, components: Vec<Component>) {
        for c in components {
            self.components.insert(c.id.clone(), c);
        }
    }

    /// Apply a server-pushed data model operation to the local copy.
    pub fn apply_server_op(&mut self, op: &PatchOp) -> Result<(), PatchError> {
        self.data.apply(op)
    }

    /// The local data model copy.
    pub fn data(&self) -> &DataModelStore {
        &self.data
    }

    /// Reduce one command against local state.
    ///
    /// `SetPath` returns `Ok(None)`: the mutation is local and nothing
    /// leaves the client. `FireAction` returns the resolved action to send.
    pub fn reduce(&mut self, command: ClientCommand) -> Result<Option<FiredAction>, ClientError> {
        match command {
            ClientCommand::SetPath { path, value } => {
                // Local patch failures are component/binding bugs; surface
                // them to the caller rather than dropping the keystroke.
                self.data.apply(&PatchOp::replace(path, value))?;
                Ok(None)
            }
            ClientCommand::FireAction {
                source_component_id,
            } => {
                let component = self.components.get(&source_component_id).ok_or_else(|| {
                    ClientError::UnknownComponent {
                        id: source_component_id.clone(),
                    }
                })?;
                let Some(spec) = component.action() else {
                    // A press on a component with no declared action is a
                    // no-op, same as a disabled button.
                    return Ok(None);
                };
                let ResolvedContext { values, warnings } =
                    resolve_context(&self.data, &spec.context);
                Ok(Some(FiredAction {
                    name: spec.name.clone(),
                    source_component_id,
                    context: values,
                    warnings,
                }))
            }
        }
    }

    /// Convenience: the bound path of a two-way component, if any.
    pub fn bound_path(&self, component_id: &str) -> Option<&Path> {
        match &self.components.get(component_id)?.kind {
            crate::ComponentKind::TextField { value, .. }
            | crate::ComponentKind::CheckBox { value, .. }
            | crate::ComponentKind::Slider { value, .. } => value.as_path(),
            _ => None,
        }
    }
}

/// Build a `SetPath` command for a component's bound path, the shape a
/// rendering layer emits on each input event.
pub fn set_bound_value(
    surface: &ClientSurface,
    component_id: &str,
    value: Value,
) -> Result<ClientCommand, ClientError> {
    let path = surface
        .bound_path(component_id)
        .cloned()
        .ok_or_else(|| ClientError::UnknownComponent {
            id: component_id.to_owned(),
        })?;
    Ok(ClientCommand::SetPath { path, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionSpec, PropValue};
    use serde_json::json;
    use weft_state::path;

    fn agree_form() -> ClientSurface {
        let mut surface = ClientSurface::new();
        surface.upsert_components(vec![
            Component::check_box("cb-1", "I agree", path!("ui", "cb-1", "value")),
            Component::button(
                "b-1",
                "Submit",
                Some(
                    ActionSpec::new("submit")
                        .with_context("agreed", PropValue::path("/ui/cb-1/value")),
                ),
            ),
        ]);
        surface
            .apply_server_op(&PatchOp::replace(path!("ui", "cb-1", "value"), json!(false)))
            .unwrap();
        surface
    }

    #[test]
    fn set_path_mutates_locally_and_emits_nothing() {
        let mut surface = agree_form();
        let cmd = set_bound_value(&surface, "cb-1", json!(true)).unwrap();
        let out = surface.reduce(cmd).unwrap();
        assert!(out.is_none());
        assert_eq!(
            surface.data().get(&path!("ui", "cb-1", "value")),
            Some(&json!(true))
        );
    }

    #[test]
    fn fire_action_snapshots_local_state() {
        let mut surface = agree_form();
        surface
            .reduce(ClientCommand::SetPath {
                path: path!("ui", "cb-1", "value"),
                value: json!(true),
            })
            .unwrap();

        let fired = surface
            .reduce(ClientCommand::FireAction {
                source_component_id: "b-1".into(),
            })
            .unwrap()
            .expect("button declares an action");

        assert_eq!(fired.name, "submit");
        assert_eq!(fired.source_component_id, "b-1");
        assert_eq!(fired.context.get("agreed"), Some(&json!(true)));
        assert!(fired.warnings.is_empty());
    }

    #[test]
    fn fire_action_on_actionless_component_is_noop() {
        let mut surface = agree_form();
        let out = surface
            .reduce(ClientCommand::FireAction {
                source_component_id: "cb-1".into(),
            })
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn fire_action_unknown_component_errors() {
        let mut surface = agree_form();
        let err = surface
            .reduce(ClientCommand::FireAction {
                source_component_id: "ghost".into(),
            })
            .unwrap_err();
        assert!(matches!(err, ClientError::UnknownComponent { .. }));
    }

    #[test]
    fn snapshot_load_replaces_local_state() {
        let mut surface = agree_form();
        surface.load_snapshot(json!({"ui": {"cb-1": {"value": true}}}));
        assert_eq!(
            surface.data().get(&path!("ui", "cb-1", "value")),
            Some(&json!(true))
        );
    }

    #[test]
    fn fire_action_with_missing_path_warns_and_proceeds() {
        let mut surface = ClientSurface::new();
        surface.upsert_components(vec![Component::button(
            "b-1",
            "Go",
            Some(ActionSpec::new("go").with_context("field", PropValue::path("/never/written"))),
        )]);
        let fired = surface
            .reduce(ClientCommand::FireAction {
                source_component_id: "b-1".into(),
            })
            .unwrap()
            .unwrap();
        assert_eq!(fired.context.get("field"), Some(&json!(null)));
        assert_eq!(fired.warnings.len(), 1);
    }
}
