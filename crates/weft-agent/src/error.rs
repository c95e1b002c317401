//! The agent-side error taxonomy.

use crate::{LlmError, SurfaceBusyError};
use thiserror::Error;
use weft_state::PatchError;
use weft_surface::SurfaceError;
use weft_tools::ToolError;

/// Everything that can go wrong inside one agent run.
///
/// None of these cross the transport raw: the run loop catches them at the
/// session boundary and converts them into a terminal `runError` event plus
/// a human-readable message.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A data model operation was rejected.
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// The surface session or tree store rejected a mutation.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Tool lookup, validation or generation failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The surface is held by another run and the wait queue is full.
    #[error(transparent)]
    SurfaceBusy(#[from] SurfaceBusyError),

    /// The provider call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl AgentError {
    /// Stable machine-readable code for the terminal `runError` event.
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::Patch(_) => "patch_rejected",
            AgentError::Surface(SurfaceError::UninitializedSurface { .. }) => {
                "uninitialized_surface"
            }
            AgentError::Surface(SurfaceError::UnknownComponent { .. }) => "unknown_component",
            AgentError::Surface(_) => "surface_error",
            AgentError::Tool(ToolError::UnknownTool { .. }) => "unknown_tool",
            AgentError::Tool(ToolError::InvalidArguments(_)) => "invalid_arguments",
            AgentError::Tool(_) => "tool_error",
            AgentError::SurfaceBusy(_) => "surface_busy",
            AgentError::Llm(_) => "llm_error",
        }
    }

    /// The apology line appended to the conversation in place of UI.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Tool(ToolError::UnknownTool { name }) => format!(
                "I tried to build a UI element with a tool I don't actually \
                 have ({name}), so I couldn't render anything this turn."
            ),
            AgentError::Tool(ToolError::InvalidArguments(_)) => {
                "I produced invalid settings for the UI element I wanted to \
                 create, so I skipped rendering it."
                    .to_string()
            }
            AgentError::SurfaceBusy(_) => {
                "That surface is still being updated by a previous request; \
                 please try again in a moment."
                    .to_string()
            }
            AgentError::Llm(_) => {
                "I couldn't reach the language model to finish this turn.".to_string()
            }
            other => format!("Something went wrong while updating the UI: {other}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = AgentError::from(ToolError::UnknownTool {
            name: "teleport".into(),
        });
        assert_eq!(err.code(), "unknown_tool");
        assert!(err.user_message().contains("teleport"));

        let err = AgentError::from(SurfaceError::UninitializedSurface {
            surface_id: "s".into(),
        });
        assert_eq!(err.code(), "uninitialized_surface");

        let err = AgentError::from(LlmError::Provider("down".into()));
        assert_eq!(err.code(), "llm_error");
    }
}
