//! Surface session lifecycle.
//!
//! One session binds a surface id to its component tree and data model and
//! tracks where the surface is in its life: created on the first update,
//! rendering once a root is established, updated in place thereafter,
//! disposed exactly once.

use crate::{Component, ComponentTreeStore, SurfaceError, SurfaceResult};
use weft_state::{DataModelStore, PatchError, PatchOp};

/// Lifecycle states of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceLifecycle {
    /// Surface exists but has never been told to render.
    Created,
    /// A root has been designated and the client is rendering.
    Rendering,
    /// Rendered at least once and mutated in place since.
    Updated,
    /// Torn down; all further mutation is rejected.
    Disposed,
}

/// One logical, independently addressable UI region.
#[derive(Debug)]
pub struct SurfaceSession {
    surface_id: String,
    catalog_id: Option<String>,
    tree: ComponentTreeStore,
    data: DataModelStore,
    lifecycle: SurfaceLifecycle,
}

impl SurfaceSession {
    /// Create a session. Sessions are created by the agent layer on the
    /// first reference to an unknown surface id.
    pub fn new(surface_id: impl Into<String>, catalog_id: Option<String>) -> Self {
        Self {
            surface_id: surface_id.into(),
            catalog_id,
            tree: ComponentTreeStore::new(),
            data: DataModelStore::default(),
            lifecycle: SurfaceLifecycle::Created,
        }
    }

    /// The surface id.
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    /// The component catalog this surface renders against, if declared.
    pub fn catalog_id(&self) -> Option<&str> {
        self.catalog_id.as_deref()
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> SurfaceLifecycle {
        self.lifecycle
    }

    /// The component tree.
    pub fn tree(&self) -> &ComponentTreeStore {
        &self.tree
    }

    /// The data model.
    pub fn data(&self) -> &DataModelStore {
        &self.data
    }

    /// Upsert a batch of components, in order.
    ///
    /// After the first render this transitions the surface to `Updated`;
    /// the caller re-issues a render instruction only when the root changes.
    pub fn apply_update(&mut self, components: Vec<Component>) -> SurfaceResult<()> {
        self.ensure_live()?;
        for component in components {
            self.tree.upsert(component)?;
        }
        if self.lifecycle == SurfaceLifecycle::Rendering {
            self.lifecycle = SurfaceLifecycle::Updated;
        }
        Ok(())
    }

    /// Designate the render root and move to `Rendering`.
    ///
    /// Fails with [`SurfaceError::UninitializedSurface`] when no update has
    /// populated the tree yet, and with [`SurfaceError::UnknownComponent`]
    /// when the root id is not present.
    pub fn begin_rendering(&mut self, root_component_id: &str) -> SurfaceResult<()> {
        self.ensure_live()?;
        if self.tree.is_empty() {
            return Err(SurfaceError::UninitializedSurface {
                surface_id: self.surface_id.clone(),
            });
        }
        self.tree.set_root(root_component_id)?;
        self.lifecycle = SurfaceLifecycle::Rendering;
        Ok(())
    }

    /// The current root component id.
    pub fn root_component_id(&self) -> Option<&str> {
        self.tree.root()
    }

    /// Apply one data model operation.
    ///
    /// Callers must not mutate a disposed session; the owning registry
    /// drops sessions on disposal, so reaching one here is a logic error.
    pub fn apply_data_op(&mut self, op: &PatchOp) -> Result<(), PatchError> {
        debug_assert_ne!(self.lifecycle, SurfaceLifecycle::Disposed);
        let result = self.data.apply(op);
        if result.is_ok() && self.lifecycle == SurfaceLifecycle::Rendering {
            self.lifecycle = SurfaceLifecycle::Updated;
        }
        result
    }

    /// Tear the surface down. Tree and data model are discarded together;
    /// the session accepts no further mutation.
    pub fn dispose(&mut self) {
        self.tree = ComponentTreeStore::new();
        self.data = DataModelStore::default();
        self.lifecycle = SurfaceLifecycle::Disposed;
    }

    /// True once disposed.
    pub fn is_disposed(&self) -> bool {
        self.lifecycle == SurfaceLifecycle::Disposed
    }

    fn ensure_live(&self) -> SurfaceResult<()> {
        if self.is_disposed() {
            return Err(SurfaceError::Disposed {
                surface_id: self.surface_id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_state::path;

    fn checkbox_surface() -> SurfaceSession {
        let mut s = SurfaceSession::new("surf-1", None);
        s.apply_update(vec![Component::check_box(
            "cb-1",
            "I agree",
            path!("ui", "cb-1", "value"),
        )])
        .unwrap();
        s
    }

    #[test]
    fn lifecycle_walks_created_rendering_updated() {
        let mut s = checkbox_surface();
        assert_eq!(s.lifecycle(), SurfaceLifecycle::Created);

        s.begin_rendering("cb-1").unwrap();
        assert_eq!(s.lifecycle(), SurfaceLifecycle::Rendering);
        assert_eq!(s.root_component_id(), Some("cb-1"));

        s.apply_data_op(&PatchOp::replace(path!("ui", "cb-1", "value"), json!(false)))
            .unwrap();
        assert_eq!(s.lifecycle(), SurfaceLifecycle::Updated);
    }

    #[test]
    fn begin_rendering_before_any_update_fails() {
        let mut s = SurfaceSession::new("surf-1", None);
        let err = s.begin_rendering("cb-1").unwrap_err();
        assert!(matches!(err, SurfaceError::UninitializedSurface { .. }));
    }

    #[test]
    fn begin_rendering_unknown_root_fails() {
        let mut s = checkbox_surface();
        let err = s.begin_rendering("ghost").unwrap_err();
        assert!(matches!(err, SurfaceError::UnknownComponent { .. }));
    }

    #[test]
    fn updates_after_render_apply_in_place() {
        let mut s = checkbox_surface();
        s.begin_rendering("cb-1").unwrap();
        s.apply_update(vec![Component::text("t-1", "fine print")])
            .unwrap();
        assert_eq!(s.lifecycle(), SurfaceLifecycle::Updated);
        // Root is unchanged; no re-render required.
        assert_eq!(s.root_component_id(), Some("cb-1"));
    }

    #[test]
    fn dispose_discards_tree_and_data_together() {
        let mut s = checkbox_surface();
        s.begin_rendering("cb-1").unwrap();
        s.apply_data_op(&PatchOp::replace(path!("ui", "cb-1", "value"), json!(true)))
            .unwrap();

        s.dispose();
        assert!(s.is_disposed());
        assert!(s.tree().is_empty());
        assert_eq!(s.data().get(&path!("ui", "cb-1", "value")), None);

        let err = s.apply_update(vec![Component::text("t", "x")]).unwrap_err();
        assert!(matches!(err, SurfaceError::Disposed { .. }));
        let err = s.begin_rendering("t").unwrap_err();
        assert!(matches!(err, SurfaceError::Disposed { .. }));
    }

    #[test]
    fn catalog_id_is_kept() {
        let s = SurfaceSession::new("surf-1", Some("standard".into()));
        assert_eq!(s.catalog_id(), Some("standard"));
    }
}
