//! Provider-neutral LLM execution seam.
//!
//! Concrete provider clients live outside this workspace; the run loop only
//! needs one call shape: messages plus tool schemas in, optional content
//! plus tool calls out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Chat participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// System instruction.
    System,
    /// End user.
    User,
    /// The model.
    Assistant,
}

/// One chat message in provider-neutral form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who said it.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id.
    pub id: String,
    /// Requested tool name.
    pub name: String,
    /// Parsed arguments object.
    pub arguments: Value,
}

/// The model's answer to one call: free text, tool calls, or both.
/// Zero tool calls is a valid terminal state, not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOutcome {
    /// Assistant text, when any was produced.
    pub content: Option<String>,
    /// Requested tool calls, in the order the provider returned them.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatOutcome {
    /// A text-only outcome.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A single-tool-call outcome.
    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            content: None,
            tool_calls: vec![ToolCallRequest {
                id: id.into(),
                name: name.into(),
                arguments,
            }],
        }
    }
}

/// Errors from the provider boundary.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// The provider call failed (network, auth, rate limit, malformed
    /// response). Carried as text since providers differ wildly.
    #[error("llm provider error: {0}")]
    Provider(String),
}

/// The LLM collaborator contract consumed by the run loop.
///
/// The call is the dominant suspension point of a run; exactly one request
/// is outstanding per run, never speculative concurrent calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Execute one chat call with function-calling schemas attached.
    async fn generate_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
        temperature: f32,
    ) -> Result<ChatOutcome, LlmError>;

    /// Stable client label for logs.
    fn name(&self) -> &'static str {
        "llm_client"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_constructors() {
        let text = ChatOutcome::text("hello");
        assert_eq!(text.content.as_deref(), Some("hello"));
        assert!(text.tool_calls.is_empty());

        let call = ChatOutcome::tool_call("c1", "create_checkbox", json!({"label": "x"}));
        assert!(call.content.is_none());
        assert_eq!(call.tool_calls[0].name, "create_checkbox");
    }

    #[test]
    fn chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }
}
