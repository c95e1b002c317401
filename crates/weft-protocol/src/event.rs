//! The run event stream.
//!
//! Each agent run produces one logical, strictly ordered stream: lifecycle
//! events bracket the run, and text deltas interleave with surface messages
//! in exactly the order they were produced. The client applies events in
//! arrival order, so ordering across the two families is never relaxed.

use crate::{CodecError, SurfaceMessage};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One event on a run's stream.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    /// First event of every run.
    RunStarted {
        /// Owning thread.
        thread_id: String,
        /// This run.
        run_id: String,
    },

    /// Incremental assistant text.
    TextDelta {
        /// Message the delta belongs to.
        message_id: String,
        /// Text fragment.
        delta: String,
    },

    /// A surface protocol message, in stream order.
    Surface(SurfaceMessage),

    /// Terminal success. Exactly one of `RunFinished`/`RunError` ends a run.
    RunFinished {
        /// Owning thread.
        thread_id: String,
        /// This run.
        run_id: String,
    },

    /// Terminal failure, already translated to a human-readable message.
    RunError {
        /// What went wrong.
        message: String,
        /// Stable error code, when one applies.
        code: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum LifecycleWire {
    #[serde(rename_all = "camelCase")]
    RunStarted { thread_id: String, run_id: String },
    #[serde(rename_all = "camelCase")]
    TextDelta { message_id: String, delta: String },
    #[serde(rename_all = "camelCase")]
    RunFinished { thread_id: String, run_id: String },
    #[serde(rename_all = "camelCase")]
    RunError {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
}

impl RunEvent {
    /// Create a run-started event.
    pub fn run_started(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self::RunStarted {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
        }
    }

    /// Create a text-delta event.
    pub fn text_delta(message_id: impl Into<String>, delta: impl Into<String>) -> Self {
        Self::TextDelta {
            message_id: message_id.into(),
            delta: delta.into(),
        }
    }

    /// Create a run-finished event.
    pub fn run_finished(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self::RunFinished {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
        }
    }

    /// Create a run-error event.
    pub fn run_error(message: impl Into<String>, code: Option<String>) -> Self {
        Self::RunError {
            message: message.into(),
            code,
        }
    }

    /// True for `RunFinished` and `RunError`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::RunFinished { .. } | Self::RunError { .. })
    }

    /// The wire name of this event's type tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "runStarted",
            Self::TextDelta { .. } => "textDelta",
            Self::RunFinished { .. } => "runFinished",
            Self::RunError { .. } => "runError",
            Self::Surface(msg) => match msg {
                SurfaceMessage::SurfaceUpdate { .. } => "surfaceUpdate",
                SurfaceMessage::DataModelUpdate { .. } => "dataModelUpdate",
                SurfaceMessage::BeginRendering { .. } => "beginRendering",
                SurfaceMessage::DeleteSurface { .. } => "deleteSurface",
                SurfaceMessage::UserAction(_) => "userAction",
                SurfaceMessage::ErrorMessage { .. } => "errorMessage",
            },
        }
    }

    /// Decode an event from its JSON text form.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw).map_err(CodecError::Decode)?;
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingType)?;
        match tag {
            "runStarted" | "textDelta" | "runFinished" | "runError" => {
                let wire: LifecycleWire =
                    serde_json::from_value(value).map_err(CodecError::Decode)?;
                Ok(wire.into())
            }
            _ => SurfaceMessage::decode_value(value).map(RunEvent::Surface),
        }
    }
}

impl From<LifecycleWire> for RunEvent {
    fn from(wire: LifecycleWire) -> Self {
        match wire {
            LifecycleWire::RunStarted { thread_id, run_id } => {
                RunEvent::RunStarted { thread_id, run_id }
            }
            LifecycleWire::TextDelta { message_id, delta } => {
                RunEvent::TextDelta { message_id, delta }
            }
            LifecycleWire::RunFinished { thread_id, run_id } => {
                RunEvent::RunFinished { thread_id, run_id }
            }
            LifecycleWire::RunError { message, code } => RunEvent::RunError { message, code },
        }
    }
}

impl From<SurfaceMessage> for RunEvent {
    fn from(msg: SurfaceMessage) -> Self {
        RunEvent::Surface(msg)
    }
}

impl Serialize for RunEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Surface(msg) => msg.serialize(serializer),
            Self::RunStarted { thread_id, run_id } => LifecycleWire::RunStarted {
                thread_id: thread_id.clone(),
                run_id: run_id.clone(),
            }
            .serialize(serializer),
            Self::TextDelta { message_id, delta } => LifecycleWire::TextDelta {
                message_id: message_id.clone(),
                delta: delta.clone(),
            }
            .serialize(serializer),
            Self::RunFinished { thread_id, run_id } => LifecycleWire::RunFinished {
                thread_id: thread_id.clone(),
                run_id: run_id.clone(),
            }
            .serialize(serializer),
            Self::RunError { message, code } => LifecycleWire::RunError {
                message: message.clone(),
                code: code.clone(),
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RunEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let raw = serde_json::to_string(&value).map_err(D::Error::custom)?;
        RunEvent::decode(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_state::{path, PatchOp};

    #[test]
    fn lifecycle_wire_shapes() {
        let wire = serde_json::to_value(RunEvent::run_started("t-1", "r-1")).unwrap();
        assert_eq!(
            wire,
            json!({"type": "runStarted", "threadId": "t-1", "runId": "r-1"})
        );

        let wire = serde_json::to_value(RunEvent::text_delta("m-1", "hel")).unwrap();
        assert_eq!(
            wire,
            json!({"type": "textDelta", "messageId": "m-1", "delta": "hel"})
        );

        let wire = serde_json::to_value(RunEvent::run_error("boom", None)).unwrap();
        assert_eq!(wire, json!({"type": "runError", "message": "boom"}));
    }

    #[test]
    fn surface_events_keep_their_own_tag() {
        let event = RunEvent::from(SurfaceMessage::data_model_update(
            "s",
            PatchOp::replace(path!("a"), json!(1)),
        ));
        let wire = serde_json::to_value(&event).unwrap();
        assert_eq!(wire["type"], "dataModelUpdate");
        assert_eq!(event.type_name(), "dataModelUpdate");
    }

    #[test]
    fn round_trip_mixed_stream() {
        let events = vec![
            RunEvent::run_started("t", "r"),
            RunEvent::from(SurfaceMessage::surface_update("s", vec![])),
            RunEvent::text_delta("m", "hi"),
            RunEvent::from(SurfaceMessage::begin_rendering("s", "root")),
            RunEvent::run_finished("t", "r"),
        ];
        for event in events {
            let raw = serde_json::to_string(&event).unwrap();
            let back = RunEvent::decode(&raw).unwrap();
            assert_eq!(back, event);
        }
    }

    #[test]
    fn terminal_detection() {
        assert!(RunEvent::run_finished("t", "r").is_terminal());
        assert!(RunEvent::run_error("x", None).is_terminal());
        assert!(!RunEvent::run_started("t", "r").is_terminal());
        assert!(!RunEvent::from(SurfaceMessage::delete_surface("s")).is_terminal());
    }
}
