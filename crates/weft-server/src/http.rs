//! HTTP routes.

use crate::service::{ApiError, AppState};
use crate::sse::{spawn_fixed, spawn_run, sse_response};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;
use weft_agent::{route_action, AgentInput};
use weft_protocol::{RunEvent, SurfaceMessage};

/// Build the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/threads/:thread_id/runs", post(start_run))
        .route("/v1/surfaces/actions", post(ingest_action))
        .route("/v1/surfaces/:surface_id", delete(delete_surface))
}

async fn healthz() -> &'static str {
    "ok"
}

/// Body of a text-turn run request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunRequest {
    /// The user's message.
    text: String,
    /// Surface to render into; omitted on the first turn of a thread.
    #[serde(default)]
    surface_id: Option<String>,
}

/// Start a run from user text. The response body is the run's SSE stream.
async fn start_run(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Json(request): Json<RunRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".into()));
    }
    let input = AgentInput::text_turn(thread_id, request.surface_id, request.text);
    Ok(sse_response(spawn_run(state.runner.clone(), input)))
}

/// Envelope for out-of-band client messages.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngressEnvelope {
    /// Thread the new run joins.
    thread_id: String,
    /// A `userAction` or `errorMessage` wire message.
    message: SurfaceMessage,
}

/// Accept a `userAction` or `errorMessage` and answer with a fresh run's
/// SSE stream sharing the thread/surface identifiers.
async fn ingest_action(
    State(state): State<AppState>,
    Json(envelope): Json<IngressEnvelope>,
) -> Result<Response, ApiError> {
    match envelope.message {
        SurfaceMessage::UserAction(action) => {
            let input = route_action(envelope.thread_id, action);
            Ok(sse_response(spawn_run(state.runner.clone(), input)))
        }
        SurfaceMessage::ErrorMessage {
            code,
            surface_id,
            path,
            message,
        } => {
            // Client-side failures are logged, acknowledged with a short
            // canned run, and never forwarded to the agent as domain input.
            warn!(
                code = %code,
                surface_id = %surface_id,
                path = %path.as_ref().map(ToString::to_string).unwrap_or_default(),
                message = %message,
                "client reported surface error"
            );
            let run_id = uuid::Uuid::now_v7().simple().to_string();
            let message_id = uuid::Uuid::now_v7().simple().to_string();
            let events = vec![
                RunEvent::run_started(&envelope.thread_id, &run_id),
                RunEvent::text_delta(
                    message_id,
                    "Something went wrong displaying that UI; it has been reported.",
                ),
                RunEvent::run_finished(&envelope.thread_id, &run_id),
            ];
            Ok(sse_response(spawn_fixed(events)))
        }
        other => Err(ApiError::BadRequest(format!(
            "only userAction and errorMessage are accepted here, got {}",
            RunEvent::from(other).type_name()
        ))),
    }
}

/// Tear a surface down (thread archival and explicit deletes). Responds
/// with the `deleteSurface` message for the client to apply; idempotent.
async fn delete_surface(
    State(state): State<AppState>,
    Path(surface_id): Path<String>,
) -> Json<SurfaceMessage> {
    let message = state.runner.sessions().dispose(&surface_id).await;
    Json(message)
}
