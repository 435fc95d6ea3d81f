//! Surface lifecycle state value.

use std::fmt;

use serde::Serialize;

/// Readiness of one content surface.
///
/// ```text
/// Loading ──initialized──▶ Ready
///    │                       │
///    └──error / destroy──▶ Destroyed ◀──error / destroy
/// ```
///
/// `Loading → Ready` is the only forward transition and `Destroyed` is
/// terminal.  The transitions themselves are enforced by
/// [`crate::application::state_machine::BridgeStateMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceState {
    /// The template is loading; outbound deliveries are deferred.
    Loading,
    /// The template script reported `initialized`; deliveries are allowed.
    Ready,
    /// The surface failed or was torn down.  Nothing happens after this.
    Destroyed,
}

impl SurfaceState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SurfaceState::Destroyed)
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceState::Loading => "loading",
            SurfaceState::Ready => "ready",
            SurfaceState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
