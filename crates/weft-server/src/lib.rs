//! HTTP + SSE transport for surface protocol runs.
//!
//! One SSE stream per agent run, never shared across runs. Text turns and
//! out-of-band `userAction`/`errorMessage` POSTs both start a fresh run
//! sharing the thread/surface identifiers; the response body is that run's
//! event stream. Closing the connection cancels the run cooperatively.

pub mod http;
pub mod service;
pub mod sse;

pub use http::routes;
pub use service::{ApiError, AppState};
