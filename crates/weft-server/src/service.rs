//! Shared application state and API error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use weft_agent::AgentRunner;

/// State shared by every route. All registries are explicit — nothing is a
/// module-level singleton.
#[derive(Clone)]
pub struct AppState {
    /// The run executor with its session, lock and tool registries.
    pub runner: AgentRunner,
}

impl AppState {
    /// Create state around a configured runner.
    pub fn new(runner: AgentRunner) -> Self {
        Self { runner }
    }
}

/// Transport-level errors with HTTP mappings.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Anything that should not leak details to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}
