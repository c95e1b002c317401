//! The six surface protocol message kinds.

use crate::CodecError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use weft_state::{Path, PatchOp};
use weft_surface::{Component, FiredAction};

/// A client-originated action with its context already resolved.
///
/// The context is a snapshot taken from the client's local data model at
/// fire time; the server consumes it verbatim and never re-derives it from
/// its own (possibly diverged) store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    /// Declared action name.
    pub name: String,
    /// Surface the action originated from.
    pub surface_id: String,
    /// Component the action originated from.
    pub source_component_id: String,
    /// Client-side fire time, milliseconds since the epoch.
    pub timestamp: u64,
    /// Resolved context values.
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl UserAction {
    /// Build the wire action from a client-side [`FiredAction`].
    pub fn from_fired(fired: FiredAction, surface_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            name: fired.name,
            surface_id: surface_id.into(),
            source_component_id: fired.source_component_id,
            timestamp,
            context: fired.context,
        }
    }
}

/// One surface protocol message.
///
/// `surfaceUpdate`, `dataModelUpdate`, `beginRendering` and `deleteSurface`
/// travel server→client; `userAction` and `errorMessage` travel
/// client→server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceMessage {
    /// Insert or replace components on a surface. Creates the surface on
    /// first reference to an unknown id.
    #[serde(rename_all = "camelCase")]
    SurfaceUpdate {
        /// Target surface.
        surface_id: String,
        /// Components to upsert, in order.
        components: Vec<Component>,
    },

    /// Apply one data model operation to a surface.
    #[serde(rename_all = "camelCase")]
    DataModelUpdate {
        /// Target surface.
        surface_id: String,
        /// The operation (`op`/`path`/`value` flattened onto the message).
        #[serde(flatten)]
        op: PatchOp,
    },

    /// Designate the root component and start (or restart) rendering.
    #[serde(rename_all = "camelCase")]
    BeginRendering {
        /// Target surface.
        surface_id: String,
        /// Root of the render walk.
        root_component_id: String,
    },

    /// Tear a surface down.
    #[serde(rename_all = "camelCase")]
    DeleteSurface {
        /// Target surface.
        surface_id: String,
    },

    /// A resolved client action (client→server).
    UserAction(UserAction),

    /// A client-reported error (client→server).
    #[serde(rename_all = "camelCase")]
    ErrorMessage {
        /// Stable error code.
        code: String,
        /// Surface the error relates to.
        surface_id: String,
        /// Data model path involved, when applicable.
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<Path>,
        /// Human-readable description.
        message: String,
    },
}

impl SurfaceMessage {
    /// Create a surface-update message.
    pub fn surface_update(surface_id: impl Into<String>, components: Vec<Component>) -> Self {
        Self::SurfaceUpdate {
            surface_id: surface_id.into(),
            components,
        }
    }

    /// Create a data-model-update message.
    pub fn data_model_update(surface_id: impl Into<String>, op: PatchOp) -> Self {
        Self::DataModelUpdate {
            surface_id: surface_id.into(),
            op,
        }
    }

    /// Create a begin-rendering message.
    pub fn begin_rendering(
        surface_id: impl Into<String>,
        root_component_id: impl Into<String>,
    ) -> Self {
        Self::BeginRendering {
            surface_id: surface_id.into(),
            root_component_id: root_component_id.into(),
        }
    }

    /// Create a delete-surface message.
    pub fn delete_surface(surface_id: impl Into<String>) -> Self {
        Self::DeleteSurface {
            surface_id: surface_id.into(),
        }
    }

    /// The surface this message addresses.
    pub fn surface_id(&self) -> &str {
        match self {
            Self::SurfaceUpdate { surface_id, .. }
            | Self::DataModelUpdate { surface_id, .. }
            | Self::BeginRendering { surface_id, .. }
            | Self::DeleteSurface { surface_id }
            | Self::ErrorMessage { surface_id, .. } => surface_id,
            Self::UserAction(action) => &action.surface_id,
        }
    }

    /// True for the server→client message kinds.
    pub fn is_server_to_client(&self) -> bool {
        matches!(
            self,
            Self::SurfaceUpdate { .. }
                | Self::DataModelUpdate { .. }
                | Self::BeginRendering { .. }
                | Self::DeleteSurface { .. }
        )
    }

    /// Decode a message from its JSON text form.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw).map_err(CodecError::Decode)?;
        Self::decode_value(value)
    }

    /// Decode a message from a JSON value.
    pub fn decode_value(value: Value) -> Result<Self, CodecError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingType)?
            .to_owned();
        match serde_json::from_value(value) {
            Ok(msg) => Ok(msg),
            Err(e) => {
                const KNOWN: [&str; 6] = [
                    "surfaceUpdate",
                    "dataModelUpdate",
                    "beginRendering",
                    "deleteSurface",
                    "userAction",
                    "errorMessage",
                ];
                if KNOWN.contains(&tag.as_str()) {
                    Err(CodecError::Decode(e))
                } else {
                    Err(CodecError::UnknownType { tag })
                }
            }
        }
    }

    /// Encode to JSON text.
    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(CodecError::Encode)
    }
}
