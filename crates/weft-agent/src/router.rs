//! Action routing.
//!
//! A `userAction` arrives with its context already resolved — a snapshot of
//! the client's local data model at click time. The router shapes it into
//! an [`AgentInput`] so the same agent entry point serves text turns and
//! action turns; the action rides along as a side channel and is also
//! rendered into a user-role message the model can read.

use crate::{AgentInput, ChatMessage, RunIds};
use weft_protocol::UserAction;

/// Map a resolved action into run input for the agent layer.
///
/// The client's context snapshot is passed through verbatim: the server's
/// own store may have briefly diverged (the user can type after the last
/// push), so it is never consulted here.
pub fn route_action(thread_id: impl Into<String>, action: UserAction) -> AgentInput {
    let prompt = describe_action(&action);
    AgentInput {
        ids: RunIds {
            thread_id: Some(thread_id.into()),
            run_id: None,
            surface_id: Some(action.surface_id.clone()),
        },
        messages: vec![ChatMessage::user(prompt)],
        user_action: Some(action),
    }
}

/// Render the action as model-readable text.
fn describe_action(action: &UserAction) -> String {
    let context = serde_json::to_string(&action.context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "The user triggered the \"{}\" action on component {} with values: {}",
        action.name, action.source_component_id, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn submit_action() -> UserAction {
        let mut context = Map::new();
        context.insert("agreed".into(), json!(true));
        UserAction {
            name: "submit".into(),
            surface_id: "surf-1".into(),
            source_component_id: "b-1".into(),
            timestamp: 1_700_000_000_000,
            context,
        }
    }

    #[test]
    fn routed_input_shares_thread_and_surface_ids() {
        let input = route_action("thread-1", submit_action());
        assert_eq!(input.ids.thread_id.as_deref(), Some("thread-1"));
        assert_eq!(input.ids.surface_id.as_deref(), Some("surf-1"));
        assert!(input.ids.run_id.is_none(), "each action starts a new run");
    }

    #[test]
    fn routed_input_carries_action_as_side_channel() {
        let input = route_action("thread-1", submit_action());
        let action = input.user_action.as_ref().unwrap();
        assert_eq!(action.name, "submit");
        assert_eq!(action.context.get("agreed"), Some(&json!(true)));
    }

    #[test]
    fn routed_input_renders_action_for_the_model() {
        let input = route_action("thread-1", submit_action());
        assert_eq!(input.messages.len(), 1);
        let text = &input.messages[0].content;
        assert!(text.contains("submit"));
        assert!(text.contains("\"agreed\":true"));
    }
}
