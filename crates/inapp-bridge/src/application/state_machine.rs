//! Lifecycle state machine for one content surface.
//!
//! The machine only knows three states and three triggers:
//!
//! | Trigger                              | From             | To          |
//! |--------------------------------------|------------------|-------------|
//! | `state_changed` / `initialized`      | `Loading`        | `Ready`     |
//! | `state_changed` / `error`            | any              | `Destroyed` |
//! | explicit destroy (non-cached close)  | any              | `Destroyed` |
//!
//! Every other combination is a no-op.  Each trigger method returns the
//! [`Transition`] it performed, or `None`, so the caller can react to a state
//! change exactly once (the controller drains the outbound queue on
//! `Loading → Ready`).

use crate::domain::state::SurfaceState;

/// A state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SurfaceState,
    pub to: SurfaceState,
}

impl Transition {
    /// `true` for the single `Loading → Ready` edge.
    pub fn became_ready(&self) -> bool {
        self.from == SurfaceState::Loading && self.to == SurfaceState::Ready
    }
}

/// Owns the [`SurfaceState`] of one surface.
#[derive(Debug, Clone)]
pub struct BridgeStateMachine {
    state: SurfaceState,
}

impl Default for BridgeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeStateMachine {
    /// Starts in [`SurfaceState::Loading`].
    pub fn new() -> Self {
        Self {
            state: SurfaceState::Loading,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Whether data may be delivered into the surface right now.
    pub fn can_deliver(&self) -> bool {
        self.state == SurfaceState::Ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_terminal()
    }

    /// The template reported `initialized`.
    ///
    /// Only `Loading` moves; `Ready` stays put and `Destroyed` never leaves.
    pub fn mark_initialized(&mut self) -> Option<Transition> {
        match self.state {
            SurfaceState::Loading => self.move_to(SurfaceState::Ready),
            SurfaceState::Ready | SurfaceState::Destroyed => None,
        }
    }

    /// The template reported `error`.
    pub fn mark_failed(&mut self) -> Option<Transition> {
        self.move_to(SurfaceState::Destroyed)
    }

    /// The owner tore the surface down.
    pub fn destroy(&mut self) -> Option<Transition> {
        self.move_to(SurfaceState::Destroyed)
    }

    fn move_to(&mut self, to: SurfaceState) -> Option<Transition> {
        if self.state == to || self.state.is_terminal() {
            return None;
        }
        let transition = Transition {
            from: self.state,
            to,
        };
        self.state = to;
        Some(transition)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading_and_not_deliverable() {
        let machine = BridgeStateMachine::new();
        assert_eq!(machine.state(), SurfaceState::Loading);
        assert!(!machine.can_deliver());
    }

    #[test]
    fn test_initialized_moves_loading_to_ready() {
        // Arrange
        let mut machine = BridgeStateMachine::new();

        // Act
        let transition = machine.mark_initialized();

        // Assert
        let transition = transition.expect("Loading -> Ready must be reported");
        assert!(transition.became_ready());
        assert!(machine.can_deliver());
    }

    #[test]
    fn test_repeated_initialized_transitions_once() {
        let mut machine = BridgeStateMachine::new();

        let transitions: Vec<_> = (0..5).filter_map(|_| machine.mark_initialized()).collect();

        assert_eq!(transitions.len(), 1);
        assert_eq!(machine.state(), SurfaceState::Ready);
    }

    #[test]
    fn test_error_from_loading_destroys() {
        let mut machine = BridgeStateMachine::new();
        let transition = machine.mark_failed().unwrap();
        assert_eq!(transition.from, SurfaceState::Loading);
        assert_eq!(transition.to, SurfaceState::Destroyed);
        assert!(!transition.became_ready());
    }

    #[test]
    fn test_error_from_ready_destroys() {
        let mut machine = BridgeStateMachine::new();
        machine.mark_initialized();
        machine.mark_failed();
        assert!(machine.is_destroyed());
        assert!(!machine.can_deliver());
    }

    #[test]
    fn test_destroyed_is_terminal() {
        // Arrange
        let mut machine = BridgeStateMachine::new();
        machine.destroy();

        // Act / Assert: nothing moves the machine out of Destroyed
        assert_eq!(machine.mark_initialized(), None);
        assert_eq!(machine.mark_failed(), None);
        assert_eq!(machine.destroy(), None);
        assert_eq!(machine.state(), SurfaceState::Destroyed);
    }
}
