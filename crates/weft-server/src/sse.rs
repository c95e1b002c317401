//! SSE response plumbing.
//!
//! A run's events are framed as they are produced and pushed through a
//! bounded channel into the response body — nothing buffers the whole run,
//! first-byte latency tracks the first event. When the client closes the
//! connection the channel's receiver drops, the next send fails, and the
//! run is cancelled cooperatively.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use weft_agent::{AgentInput, AgentRunner};
use weft_protocol::{sse_frame, RunEvent, SSE_CONTENT_TYPE};

/// Spawn a run and return the channel its framed events arrive on.
pub fn spawn_run(runner: AgentRunner, input: AgentInput) -> mpsc::Receiver<Bytes> {
    let (tx, rx) = mpsc::channel::<Bytes>(16);
    let cancel = CancellationToken::new();
    tokio::spawn(async move {
        let mut stream = runner.run(input, cancel.clone());
        while let Some(event) = stream.next().await {
            let chunk = match sse_frame(&event) {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, "failed to frame run event; dropping stream");
                    break;
                }
            };
            if tx.send(chunk).await.is_err() {
                // Client went away: stop the run at its next suspension
                // point and let the dropped stream release the surface.
                debug!("sse client disconnected; cancelling run");
                cancel.cancel();
                break;
            }
        }
    });
    rx
}

/// Push a fixed list of events through a channel, framed. Used for replies
/// that need no agent run.
pub fn spawn_fixed(events: Vec<RunEvent>) -> mpsc::Receiver<Bytes> {
    let (tx, rx) = mpsc::channel::<Bytes>(16);
    tokio::spawn(async move {
        for event in events {
            let Ok(chunk) = sse_frame(&event) else {
                break;
            };
            if tx.send(chunk).await.is_err() {
                break;
            }
        }
    });
    rx
}

/// Wrap a frame channel as a `text/event-stream` response.
pub fn sse_response(mut rx: mpsc::Receiver<Bytes>) -> Response {
    let stream = async_stream::stream! {
        while let Some(chunk) = rx.recv().await {
            yield Ok::<Bytes, Infallible>(chunk);
        }
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SSE_CONTENT_TYPE),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    (headers, Body::from_stream(stream)).into_response()
}
