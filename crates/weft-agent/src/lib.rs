//! Agent turn, action routing and the run event loop.
//!
//! One agent run is a single async task producing a lazy, ordered, finite
//! stream of [`weft_protocol::RunEvent`]s. The transport consumes the
//! stream as it is produced; nothing is buffered run-wide. Runs mutating
//! the same surface are serialized by a per-surface advisory lock.

mod error;
mod input;
mod llm;
mod locks;
mod router;
mod runner;
mod sessions;

pub use error::AgentError;
pub use input::{AgentInput, RunConfig, RunIds};
pub use llm::{ChatMessage, ChatOutcome, ChatRole, LlmClient, LlmError, ToolCallRequest};
pub use locks::{SurfaceBusyError, SurfaceGuard, SurfaceLockRegistry};
pub use router::route_action;
pub use runner::AgentRunner;
pub use sessions::SessionRegistry;
