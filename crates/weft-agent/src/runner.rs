//! The run loop.
//!
//! One call to [`AgentRunner::run`] produces the whole run as a lazy
//! stream: `runStarted` first, then text deltas and surface messages in
//! production order, then exactly one terminal `runFinished` or `runError`.
//! The surface lock is held for the duration and released when the stream
//! is dropped or finishes.

use crate::{
    AgentError, AgentInput, ChatMessage, ChatOutcome, LlmClient, RunConfig, SessionRegistry,
    SurfaceLockRegistry,
};
use async_stream::stream;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use weft_protocol::RunEvent;
use weft_tools::{GeneratorRegistry, IdGen};

/// A boxed run event stream.
pub type RunEventStream = Pin<Box<dyn Stream<Item = RunEvent> + Send>>;

/// Executes agent runs against shared registries.
///
/// All collaborators are explicit constructor arguments — there is no
/// module-level state. Clone-cheap: everything inside is an `Arc`.
#[derive(Clone)]
pub struct AgentRunner {
    llm: Arc<dyn LlmClient>,
    tools: Arc<GeneratorRegistry>,
    ids: Arc<dyn IdGen>,
    sessions: Arc<SessionRegistry>,
    locks: Arc<SurfaceLockRegistry>,
    config: RunConfig,
}

impl AgentRunner {
    /// Create a runner.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<GeneratorRegistry>,
        ids: Arc<dyn IdGen>,
        sessions: Arc<SessionRegistry>,
        locks: Arc<SurfaceLockRegistry>,
        config: RunConfig,
    ) -> Self {
        Self {
            llm,
            tools,
            ids,
            sessions,
            locks,
            config,
        }
    }

    /// The shared session registry.
    pub fn sessions(&self) -> &Arc<SessionRegistry> {
        &self.sessions
    }

    /// Execute one run.
    ///
    /// Cancellation is cooperative: the token is checked at every
    /// suspension point; once tripped the stream stops emitting and the
    /// surface lock is released. The in-flight provider call is abandoned,
    /// not killed — it is an external HTTP request.
    pub fn run(&self, input: AgentInput, cancel: CancellationToken) -> RunEventStream {
        let this = self.clone();
        Box::pin(stream! {
            let thread_id = input
                .ids
                .thread_id
                .clone()
                .unwrap_or_else(|| this.ids.next_id("thread"));
            let run_id = input
                .ids
                .run_id
                .clone()
                .unwrap_or_else(|| this.ids.next_id("run"));
            let surface_id = input
                .ids
                .surface_id
                .clone()
                .unwrap_or_else(|| this.ids.next_id("surface"));

            yield RunEvent::run_started(&thread_id, &run_id);

            // Serialize against other runs on this surface. Queued in
            // arrival order; a full queue is a terminal error for this run.
            let acquired = tokio::select! {
                () = cancel.cancelled() => None,
                result = this.locks.acquire(&surface_id) => Some(result),
            };
            let Some(acquired) = acquired else {
                debug!(run_id = %run_id, "run cancelled while waiting for surface lock");
                return;
            };
            let guard = match acquired {
                Ok(guard) => guard,
                Err(busy) => {
                    let err = AgentError::from(busy);
                    yield RunEvent::text_delta(this.ids.next_id("msg"), err.user_message());
                    yield RunEvent::run_error(err.to_string(), Some(err.code().to_string()));
                    return;
                }
            };
            debug!(run_id = %run_id, surface_id = guard.surface_id(), "surface lock acquired");

            let messages = this.build_messages(&input);
            let schemas = this.tools.function_schemas();

            // The provider call is the dominant suspension point; exactly
            // one request is outstanding per run.
            let outcome = tokio::select! {
                () = cancel.cancelled() => None,
                result = this.llm.generate_with_tools(
                    &messages,
                    &schemas,
                    this.config.temperature,
                ) => Some(result),
            };
            let Some(outcome) = outcome else {
                debug!(run_id = %run_id, "run cancelled during provider call");
                return;
            };
            let ChatOutcome { content, tool_calls } = match outcome {
                Ok(outcome) => outcome,
                Err(e) => {
                    let err = AgentError::from(e);
                    warn!(run_id = %run_id, error = %err, "provider call failed");
                    yield RunEvent::text_delta(this.ids.next_id("msg"), err.user_message());
                    yield RunEvent::run_error(err.to_string(), Some(err.code().to_string()));
                    return;
                }
            };

            if let Some(text) = content.filter(|t| !t.is_empty()) {
                yield RunEvent::text_delta(this.ids.next_id("msg"), text);
            }

            // Zero tool calls: a plain text turn, a valid terminal state.
            let Some(call) = tool_calls.into_iter().next() else {
                yield RunEvent::run_finished(&thread_id, &run_id);
                return;
            };

            debug!(run_id = %run_id, tool = %call.name, "invoking component generator");
            let generated = this
                .tools
                .invoke(&call.name, call.arguments, this.ids.as_ref());
            let ui = match generated {
                Ok(ui) => ui,
                Err(e) => {
                    // Hallucinated tool name or malformed arguments: the
                    // turn survives as text, the run ends in error state.
                    let err = AgentError::from(e);
                    warn!(run_id = %run_id, error = %err, "tool invocation rejected");
                    yield RunEvent::text_delta(this.ids.next_id("msg"), err.user_message());
                    yield RunEvent::run_error(err.to_string(), Some(err.code().to_string()));
                    return;
                }
            };

            if cancel.is_cancelled() {
                debug!(run_id = %run_id, "run cancelled before surface mutation");
                return;
            }

            match this.sessions.apply_generated(&surface_id, ui).await {
                Ok(surface_messages) => {
                    for message in surface_messages {
                        yield RunEvent::from(message);
                    }
                    yield RunEvent::run_finished(&thread_id, &run_id);
                }
                Err(e) => {
                    yield RunEvent::text_delta(this.ids.next_id("msg"), e.user_message());
                    yield RunEvent::run_error(e.to_string(), Some(e.code().to_string()));
                }
            }

            drop(guard);
        })
    }

    /// Compose the prompt: system instruction, then the conversation as
    /// provided (action turns already carry their rendered description).
    fn build_messages(&self, input: &AgentInput) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(input.messages.len() + 1);
        messages.push(ChatMessage::system(&self.config.system_prompt));
        messages.extend(input.messages.iter().cloned());
        messages
    }
}

impl std::fmt::Debug for AgentRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRunner")
            .field("llm", &self.llm.name())
            .field("tools", &self.tools)
            .finish()
    }
}
