//! Component model, tree store and surface session lifecycle.
//!
//! A *surface* is one logical, independently addressable UI region owned by
//! an agent run. It binds a tree of typed components to a path-addressed
//! data model; both live and die together with the session.

mod action;
mod client;
mod component;
mod error;
mod session;
mod tree;

pub use action::{resolve_context, MissingPathWarning, ResolvedContext};
pub use client::{set_bound_value, ClientCommand, ClientError, ClientSurface, FiredAction};
pub use component::{ActionSpec, Component, ComponentKind, PropValue};
pub use error::{SurfaceError, SurfaceResult};
pub use session::{SurfaceLifecycle, SurfaceSession};
pub use tree::ComponentTreeStore;
