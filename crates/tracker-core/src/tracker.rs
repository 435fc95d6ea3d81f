//! The tracking collaborator boundary.
//!
//! The bridge never talks to an analytics backend directly.  It hands each
//! template-raised event to an [`EventTracker`] that the host supplies at
//! construction time.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::event::TrackEvent;

/// Receives tracked events from the SDK core.
///
/// Implementations must not block: the bridge calls `track` from the thread
/// that owns the content surface.
#[cfg_attr(test, mockall::automock)]
pub trait EventTracker: Send + Sync {
    /// Accepts one event for delivery.
    fn track(&self, event: TrackEvent);
}

/// Keeps every tracked event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    events: Mutex<Vec<TrackEvent>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events recorded so far.
    pub fn events(&self) -> Vec<TrackEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventTracker for RecordingTracker {
    fn track(&self, event: TrackEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Writes one `info` record per event to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTracker;

impl EventTracker for TracingTracker {
    fn track(&self, event: TrackEvent) {
        let values = serde_json::Value::Object(event.values);
        info!(event = %event.name, %values, "event tracked");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
