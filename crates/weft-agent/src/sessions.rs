//! Shared surface session registry.
//!
//! Sessions are created on first reference to an unknown surface id and
//! owned here for the lifetime of the surface. Mutation happens only while
//! the caller holds the surface's advisory lock, so the registry itself
//! needs no per-surface synchronization beyond the map lock.

use crate::AgentError;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use weft_protocol::SurfaceMessage;
use weft_surface::{SurfaceLifecycle, SurfaceSession};
use weft_tools::GeneratedUi;

/// Registry of live surface sessions, keyed by surface id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SurfaceSession>>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a generated UI to a surface, creating the session on first
    /// reference, and return the protocol messages in emission order:
    /// one `surfaceUpdate`, the seeding `dataModelUpdate`s, and a
    /// `beginRendering` whenever the root component changed.
    pub async fn apply_generated(
        &self,
        surface_id: &str,
        ui: GeneratedUi,
    ) -> Result<Vec<SurfaceMessage>, AgentError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .entry(surface_id.to_owned())
            .or_insert_with(|| new_session(surface_id));

        let mut messages = Vec::with_capacity(ui.data_patch.len() + 2);

        session.apply_update(ui.components.clone())?;
        messages.push(SurfaceMessage::surface_update(surface_id, ui.components));

        for op in ui.data_patch {
            session.apply_data_op(&op)?;
            messages.push(SurfaceMessage::data_model_update(surface_id, op));
        }

        if session.root_component_id() != Some(ui.root_id.as_str()) {
            session.begin_rendering(&ui.root_id)?;
            messages.push(SurfaceMessage::begin_rendering(surface_id, ui.root_id));
        }

        Ok(messages)
    }

    /// Tear a surface down and return the `deleteSurface` message to push.
    /// Unknown ids are a no-op returning the message anyway, so teardown is
    /// idempotent.
    pub async fn dispose(&self, surface_id: &str) -> SurfaceMessage {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(surface_id) {
            session.dispose();
            sessions.remove(surface_id);
            debug!(surface_id, "surface disposed");
        }
        SurfaceMessage::delete_surface(surface_id)
    }

    /// Tear down every surface belonging to a thread teardown sweep.
    pub async fn dispose_all(&self) -> Vec<SurfaceMessage> {
        let mut sessions = self.sessions.lock().await;
        let ids: Vec<String> = sessions.keys().cloned().collect();
        for (_, session) in sessions.iter_mut() {
            session.dispose();
        }
        sessions.clear();
        ids.into_iter()
            .map(SurfaceMessage::delete_surface)
            .collect()
    }

    /// Run a closure against a session's current state (diagnostics and
    /// tests). `None` when the surface does not exist.
    pub async fn inspect<R>(
        &self,
        surface_id: &str,
        f: impl FnOnce(&SurfaceSession) -> R,
    ) -> Option<R> {
        let sessions = self.sessions.lock().await;
        sessions.get(surface_id).map(f)
    }

    /// Lifecycle of a surface, if it exists.
    pub async fn lifecycle(&self, surface_id: &str) -> Option<SurfaceLifecycle> {
        self.inspect(surface_id, |s| s.lifecycle()).await
    }

    /// Number of live surfaces.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// True when no surfaces are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

fn new_session(surface_id: &str) -> SurfaceSession {
    debug!(surface_id, "creating surface session");
    SurfaceSession::new(surface_id, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_state::{path, Patch, PatchOp};
    use weft_surface::Component;

    fn checkbox_ui() -> GeneratedUi {
        GeneratedUi::single(
            Component::check_box("cb-0", "I agree", path!("ui", "cb-0", "value")),
            Patch::new().with_op(PatchOp::replace(path!("ui", "cb-0", "value"), json!(false))),
        )
    }

    #[tokio::test]
    async fn apply_generated_emits_ordered_messages() {
        let registry = SessionRegistry::new();
        let messages = registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();

        let kinds: Vec<&str> = messages
            .iter()
            .map(|m| match m {
                SurfaceMessage::SurfaceUpdate { .. } => "surfaceUpdate",
                SurfaceMessage::DataModelUpdate { .. } => "dataModelUpdate",
                SurfaceMessage::BeginRendering { .. } => "beginRendering",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["surfaceUpdate", "dataModelUpdate", "beginRendering"]);

        // Server store reflects the seed value.
        let value = registry
            .inspect("surf-1", |s| s.data().get(&path!("ui", "cb-0", "value")).cloned())
            .await
            .unwrap();
        assert_eq!(value, Some(json!(false)));
    }

    #[tokio::test]
    async fn unchanged_root_skips_begin_rendering() {
        let registry = SessionRegistry::new();
        registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();

        // Same root again: update in place, no re-render instruction.
        let messages = registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();
        assert!(messages
            .iter()
            .all(|m| !matches!(m, SurfaceMessage::BeginRendering { .. })));
        assert_eq!(
            registry.lifecycle("surf-1").await,
            Some(SurfaceLifecycle::Updated)
        );
    }

    #[tokio::test]
    async fn changed_root_re_renders() {
        let registry = SessionRegistry::new();
        registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();

        let replacement = GeneratedUi::single(Component::text("t-0", "done"), Patch::new());
        let messages = registry.apply_generated("surf-1", replacement).await.unwrap();
        assert!(messages
            .iter()
            .any(|m| matches!(m, SurfaceMessage::BeginRendering { root_component_id, .. }
                if root_component_id == "t-0")));
    }

    #[tokio::test]
    async fn dispose_is_idempotent() {
        let registry = SessionRegistry::new();
        registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();
        assert_eq!(registry.len().await, 1);

        let msg = registry.dispose("surf-1").await;
        assert!(matches!(msg, SurfaceMessage::DeleteSurface { .. }));
        assert!(registry.is_empty().await);

        // Second dispose still yields the message, touches nothing.
        let msg = registry.dispose("surf-1").await;
        assert!(matches!(msg, SurfaceMessage::DeleteSurface { .. }));
    }

    #[tokio::test]
    async fn dispose_all_sweeps_every_surface() {
        let registry = SessionRegistry::new();
        registry.apply_generated("surf-1", checkbox_ui()).await.unwrap();
        registry.apply_generated("surf-2", checkbox_ui()).await.unwrap();
        let messages = registry.dispose_all().await;
        assert_eq!(messages.len(), 2);
        assert!(registry.is_empty().await);
    }
}
