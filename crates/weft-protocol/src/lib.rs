//! Wire messages, the run event stream and SSE framing.
//!
//! This crate is the single choke point for the wire format: every message
//! that crosses the transport is encoded and decoded here, so versioning
//! decisions live in one place. Unknown message types and unknown component
//! kinds fail decoding with a typed error — nothing passes through untyped.

mod error;
mod event;
mod message;
mod sse;

pub use error::CodecError;
pub use event::RunEvent;
pub use message::{SurfaceMessage, UserAction};
pub use sse::{sse_frame, SSE_CONTENT_TYPE};
