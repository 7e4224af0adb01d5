//! Scoped overlay click listener.

use std::sync::Arc;

use tendertale_core::surface::{ListenerId, OverlayHandler, RenderSurface};
use tracing::debug;

/// A click listener attached to the dialogue overlay. Detaches itself when
/// dropped, so a listener never outlives the playback that owns it.
pub struct OverlayListener {
    surface: Arc<dyn RenderSurface>,
    id: ListenerId,
}

impl OverlayListener {
    /// Attaches `handler` to the overlay of `surface`.
    pub fn attach(surface: Arc<dyn RenderSurface>, handler: OverlayHandler) -> Self {
        let id = surface.attach_overlay(handler);
        debug!(listener = id.0, "overlay listener attached");
        Self { surface, id }
    }
}

impl std::fmt::Debug for OverlayListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayListener")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for OverlayListener {
    fn drop(&mut self) {
        self.surface.detach_overlay(self.id);
        debug!(listener = self.id.0, "overlay listener detached");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tendertale_test_support::RecordingSurface;

    use super::*;

    #[test]
    fn test_listener_receives_clicks_until_dropped() {
        // Arrange
        let surface = Arc::new(RecordingSurface::new());
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        let listener = OverlayListener::attach(
            surface.clone(),
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        // Act
        surface.click();
        drop(listener);
        surface.click();

        // Assert
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
        assert_eq!(surface.listener_count(), 0);
    }
}
