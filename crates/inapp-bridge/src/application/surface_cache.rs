//! Pool of one warm surface for reuse between messages.
//!
//! Spinning up a web renderer and loading the template is the slowest part of
//! showing a message.  With caching enabled the surface is not thrown away
//! when a message closes: the template is told to reset its page state and the
//! controller is parked here until the next message.

use tracing::debug;

use crate::application::controller::ContentSurfaceController;
use crate::application::host::ContentSurface;
use crate::domain::config::BridgeConfig;

/// Holds at most one idle controller.
pub struct SurfaceCache<S: ContentSurface> {
    enabled: bool,
    idle: Option<ContentSurfaceController<S>>,
}

impl<S: ContentSurface> SurfaceCache<S> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            idle: None,
        }
    }

    /// Uses [`BridgeConfig::cache_enabled`].
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.cache_enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a controller is parked and ready for reuse.
    pub fn is_warm(&self) -> bool {
        self.idle.is_some()
    }

    /// Hands out the parked controller, or builds one with `create`.
    pub fn checkout<F>(&mut self, create: F) -> ContentSurfaceController<S>
    where
        F: FnOnce() -> ContentSurfaceController<S>,
    {
        match self.idle.take() {
            Some(controller) => {
                debug!(surface = %controller.id(), "reusing cached surface");
                controller
            }
            None => create(),
        }
    }

    /// Takes back a controller whose message is no longer shown.
    ///
    /// The controller is reset and parked when caching is enabled and it is
    /// still alive; otherwise it is destroyed.  A previously parked controller
    /// is destroyed when replaced.
    pub fn release(&mut self, mut controller: ContentSurfaceController<S>) {
        if !self.enabled || controller.is_destroyed() {
            controller.reset_or_destroy(false);
            return;
        }
        controller.reset_or_destroy(true);
        if let Some(mut previous) = self.idle.replace(controller) {
            previous.reset_or_destroy(false);
        }
    }

    /// Destroys the parked controller, if any.
    pub fn clear(&mut self) {
        if let Some(mut controller) = self.idle.take() {
            controller.reset_or_destroy(false);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
