//! Run input and configuration.

use crate::ChatMessage;
use serde::{Deserialize, Serialize};
use weft_protocol::UserAction;

/// Identifiers for one run. Missing ids are minted at run start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunIds {
    /// Conversation the run belongs to. `None` → auto-generate.
    pub thread_id: Option<String>,
    /// This run. `None` → auto-generate.
    pub run_id: Option<String>,
    /// Surface the run renders into. `None` → auto-generate.
    pub surface_id: Option<String>,
}

/// Input to one agent run: conversation text, an out-of-band user action,
/// or both. The same entry point handles text turns and action turns — the
/// transport never branches on which it is.
#[derive(Debug, Clone, Default)]
pub struct AgentInput {
    /// Run identifiers, minted where absent.
    pub ids: RunIds,
    /// Conversation messages to present to the model.
    pub messages: Vec<ChatMessage>,
    /// The user action that triggered this run, when one did.
    pub user_action: Option<UserAction>,
}

impl AgentInput {
    /// Build a plain text turn.
    pub fn text_turn(
        thread_id: impl Into<String>,
        surface_id: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            ids: RunIds {
                thread_id: Some(thread_id.into()),
                run_id: None,
                surface_id,
            },
            messages: vec![ChatMessage::user(text)],
            user_action: None,
        }
    }
}

/// Static per-agent configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// System prompt prepended to every call.
    pub system_prompt: String,
    /// Sampling temperature handed to the provider.
    pub temperature: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are an assistant that can build interactive UI \
                            for the user. Use the available tools to create UI \
                            elements when the user asks for something visual or \
                            interactive; otherwise answer in plain text."
                .to_string(),
            temperature: 0.2,
        }
    }
}
