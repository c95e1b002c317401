//! End-to-end run loop scenarios against a scripted provider.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use weft_agent::{
    route_action, AgentInput, AgentRunner, ChatMessage, ChatOutcome, LlmClient, LlmError,
    RunConfig, SessionRegistry, SurfaceLockRegistry,
};
use weft_protocol::{RunEvent, SurfaceMessage, UserAction};
use weft_state::Path;
use weft_surface::{ClientCommand, ClientSurface};
use weft_tools::{default_registry, SeqIdGen};

/// Provider fake that replays scripted outcomes, optionally after a delay.
struct ScriptedLlm {
    outcomes: Mutex<VecDeque<Result<ChatOutcome, LlmError>>>,
    delay: Duration,
}

impl ScriptedLlm {
    fn new(outcomes: Vec<Result<ChatOutcome, LlmError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Value],
        _temperature: f32,
    ) -> Result<ChatOutcome, LlmError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatOutcome::text("script exhausted")))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Provider fake whose call never resolves.
struct StalledLlm;

#[async_trait]
impl LlmClient for StalledLlm {
    async fn generate_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: &[Value],
        _temperature: f32,
    ) -> Result<ChatOutcome, LlmError> {
        futures::future::pending().await
    }
}

fn runner_with(llm: Arc<dyn LlmClient>) -> AgentRunner {
    AgentRunner::new(
        llm,
        Arc::new(default_registry()),
        Arc::new(SeqIdGen::new()),
        Arc::new(SessionRegistry::new()),
        Arc::new(SurfaceLockRegistry::new()),
        RunConfig::default(),
    )
}

async fn collect(runner: &AgentRunner, input: AgentInput) -> Vec<RunEvent> {
    runner
        .run(input, CancellationToken::new())
        .collect::<Vec<_>>()
        .await
}

fn type_names(events: &[RunEvent]) -> Vec<&'static str> {
    events.iter().map(RunEvent::type_name).collect()
}

#[tokio::test]
async fn plain_text_turn_emits_no_surface_messages() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::text(
        "The capital of France is Paris.",
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn("thread-1", None, "capital of France?"),
    )
    .await;

    assert_eq!(
        type_names(&events),
        ["runStarted", "textDelta", "runFinished"]
    );
    let RunEvent::TextDelta { delta, .. } = &events[1] else {
        panic!("expected text delta");
    };
    assert!(delta.contains("Paris"));
}

#[tokio::test]
async fn checkbox_turn_emits_protocol_messages_in_order() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
        "call-1",
        "create_checkbox",
        json!({"label": "I agree to the terms and conditions"}),
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn(
            "thread-1",
            Some("surf-1".into()),
            "create a checkbox to agree to terms",
        ),
    )
    .await;

    assert_eq!(
        type_names(&events),
        [
            "runStarted",
            "surfaceUpdate",
            "dataModelUpdate",
            "beginRendering",
            "runFinished",
        ]
    );

    // The update declares the component before any data lands on it.
    let RunEvent::Surface(SurfaceMessage::SurfaceUpdate { surface_id, components }) = &events[1]
    else {
        panic!("expected surfaceUpdate");
    };
    assert_eq!(surface_id, "surf-1");
    assert_eq!(components[0].kind_name(), "checkBox");

    let RunEvent::Surface(SurfaceMessage::DataModelUpdate { op, .. }) = &events[2] else {
        panic!("expected dataModelUpdate");
    };
    assert_eq!(op.value(), Some(&json!(false)));

    let RunEvent::Surface(SurfaceMessage::BeginRendering { root_component_id, .. }) = &events[3]
    else {
        panic!("expected beginRendering");
    };
    assert!(root_component_id.starts_with("checkbox-"));
}

#[tokio::test]
async fn form_round_trip_through_client_and_router() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
        "call-1",
        "create_form",
        json!({
            "fields": [{"label": "I agree", "kind": "checkbox"}],
            "action_name": "submit",
        }),
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn("thread-1", Some("surf-1".into()), "terms form please"),
    )
    .await;

    // Replay the server push into a client-side surface copy.
    let mut client = ClientSurface::new();
    for event in &events {
        match event {
            RunEvent::Surface(SurfaceMessage::SurfaceUpdate { components, .. }) => {
                client.upsert_components(components.clone());
            }
            RunEvent::Surface(SurfaceMessage::DataModelUpdate { op, .. }) => {
                client.apply_server_op(op).unwrap();
            }
            _ => {}
        }
    }

    // Tick the box: local mutation only, no network round-trip.
    // Ids are deterministic under the seeded generator: the runner minted
    // "run-0", then the form minted checkbox-1, button-2, column-3.
    let checkbox_path = Path::parse("/ui/checkbox-1/value");
    assert_eq!(client.data().get(&checkbox_path), Some(&json!(false)));
    client
        .reduce(ClientCommand::SetPath {
            path: checkbox_path.clone(),
            value: json!(true),
        })
        .unwrap();

    // Press submit: the context snapshot comes from the local copy.
    let fired = client
        .reduce(ClientCommand::FireAction {
            source_component_id: "button-2".into(),
        })
        .unwrap()
        .expect("submit button declares an action");
    let action = UserAction::from_fired(fired, "surf-1", 1_700_000_000_000);
    assert_eq!(action.context.get("i_agree"), Some(&json!(true)));

    // Routing shapes it into a new run on the same thread and surface.
    let input = route_action("thread-1", action);
    assert_eq!(input.ids.surface_id.as_deref(), Some("surf-1"));
    assert!(input.user_action.is_some());
}

#[tokio::test]
async fn hallucinated_tool_becomes_text_and_run_error() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
        "call-1",
        "teleport_surface",
        json!({}),
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn("thread-1", Some("surf-1".into()), "do a thing"),
    )
    .await;

    assert_eq!(type_names(&events), ["runStarted", "textDelta", "runError"]);
    let RunEvent::RunError { code, .. } = &events[2] else {
        panic!("expected runError");
    };
    assert_eq!(code.as_deref(), Some("unknown_tool"));
    // No surface was created for the failed turn.
    assert!(runner.sessions().is_empty().await);
}

#[tokio::test]
async fn invalid_arguments_become_text_and_run_error() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
        "call-1",
        "create_checkbox",
        json!({"label": 42}),
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn("thread-1", Some("surf-1".into()), "checkbox"),
    )
    .await;

    let RunEvent::RunError { code, .. } = events.last().unwrap() else {
        panic!("expected runError");
    };
    assert_eq!(code.as_deref(), Some("invalid_arguments"));
}

#[tokio::test]
async fn provider_failure_becomes_run_error() {
    let runner = runner_with(Arc::new(ScriptedLlm::new(vec![Err(LlmError::Provider(
        "connection refused".into(),
    ))])));
    let events = collect(
        &runner,
        AgentInput::text_turn("thread-1", None, "hello"),
    )
    .await;

    let RunEvent::RunError { code, message } = events.last().unwrap() else {
        panic!("expected runError");
    };
    assert_eq!(code.as_deref(), Some("llm_error"));
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn queued_runs_mutate_the_surface_in_start_order() {
    // Both runners share sessions and locks; the first holds the surface
    // through a slow provider call while the second queues behind it.
    let sessions = Arc::new(SessionRegistry::new());
    let locks = Arc::new(SurfaceLockRegistry::new());
    let make_runner = |llm: Arc<dyn LlmClient>, seed: Arc<SeqIdGen>| {
        AgentRunner::new(
            llm,
            Arc::new(default_registry()),
            seed,
            sessions.clone(),
            locks.clone(),
            RunConfig::default(),
        )
    };

    let slow = make_runner(
        Arc::new(
            ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
                "call-1",
                "create_text",
                json!({"text": "first"}),
            ))])
            .with_delay(Duration::from_millis(100)),
        ),
        Arc::new(SeqIdGen::new()),
    );
    let fast = make_runner(
        Arc::new(ScriptedLlm::new(vec![Ok(ChatOutcome::tool_call(
            "call-2",
            "create_text",
            json!({"text": "second"}),
        ))])),
        Arc::new(SeqIdGen::new()),
    );

    let log: Arc<Mutex<Vec<(&'static str, &'static str)>>> = Arc::new(Mutex::new(Vec::new()));
    let drive = |runner: AgentRunner, label: &'static str, log: Arc<Mutex<Vec<_>>>| {
        tokio::spawn(async move {
            let mut stream = runner.run(
                AgentInput::text_turn("thread-1", Some("surf-1".into()), label),
                CancellationToken::new(),
            );
            while let Some(event) = stream.next().await {
                log.lock().unwrap().push((label, event.type_name()));
            }
        })
    };

    let first = drive(slow, "first", log.clone());
    // Ensure the first run wins the lock before the second starts.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = drive(fast, "second", log.clone());
    first.await.unwrap();
    second.await.unwrap();

    let log = log.lock().unwrap();
    let first_finish = log
        .iter()
        .position(|(l, t)| *l == "first" && *t == "runFinished")
        .expect("first run finished");
    let second_update = log
        .iter()
        .position(|(l, t)| *l == "second" && *t == "surfaceUpdate")
        .expect("second run updated the surface");
    assert!(
        first_finish < second_update,
        "second run mutated the surface before the first finished: {log:?}"
    );
}

#[tokio::test]
async fn cancellation_stops_the_stream_and_releases_the_lock() {
    let locks = Arc::new(SurfaceLockRegistry::new());
    let runner = AgentRunner::new(
        Arc::new(StalledLlm),
        Arc::new(default_registry()),
        Arc::new(SeqIdGen::new()),
        Arc::new(SessionRegistry::new()),
        locks.clone(),
        RunConfig::default(),
    );

    let cancel = CancellationToken::new();
    let mut stream = runner.run(
        AgentInput::text_turn("thread-1", Some("surf-1".into()), "hello"),
        cancel.clone(),
    );

    // First event arrives, then the provider call hangs.
    let started = stream.next().await.unwrap();
    assert_eq!(started.type_name(), "runStarted");

    cancel.cancel();
    // The stream ends without a terminal event; the transport layer treats
    // a client disconnect the same way.
    assert!(stream.next().await.is_none());

    // The surface lock was released with the stream.
    let guard = locks.acquire("surf-1").await.unwrap();
    assert_eq!(guard.surface_id(), "surf-1");
}
