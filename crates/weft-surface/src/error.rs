//! Surface and component tree errors.

use thiserror::Error;

/// Result alias for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors raised by the component tree store and the surface session.
///
/// All variants are recoverable at the run boundary: they become a terminal
/// run error plus a user-facing explanation, never a crash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// A component id was referenced that the tree does not contain.
    #[error("unknown component: {id}")]
    UnknownComponent {
        /// The missing component id.
        id: String,
    },

    /// Rendering was requested before any update established a root.
    #[error("surface {surface_id} has no components yet; cannot begin rendering")]
    UninitializedSurface {
        /// The offending surface.
        surface_id: String,
    },

    /// Inserting a child would make it its own ancestor.
    #[error("component {child} is an ancestor of {parent}; cycles are forbidden")]
    CycleDetected {
        /// The would-be parent.
        parent: String,
        /// The child that closes the cycle.
        child: String,
    },

    /// The surface has been disposed and accepts no further mutations.
    #[error("surface {surface_id} is disposed")]
    Disposed {
        /// The disposed surface.
        surface_id: String,
    },

    /// No session exists for the given surface id.
    #[error("unknown surface: {surface_id}")]
    UnknownSurface {
        /// The missing surface id.
        surface_id: String,
    },
}
