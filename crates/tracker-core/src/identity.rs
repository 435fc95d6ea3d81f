//! Visitor identity and tracking opt-out.
//!
//! Both are plain bookkeeping.  The host owns the persisted values; these
//! types only hold the live state for one SDK instance.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::event::TrackEvent;
use crate::tracker::EventTracker;

/// Identifies one visitor (one app installation) to the tracking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(Uuid);

impl VisitorId {
    /// Generates a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Restores an identity previously handed out by [`VisitorId::generate`].
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Replaces this identity with a new random one and returns the old value.
    ///
    /// Used when the host wants subsequent events attributed to a new visitor
    /// (for example after a user signs out).
    pub fn renew(&mut self) -> VisitorId {
        std::mem::replace(self, Self::generate())
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Wraps a tracker and drops every event while the user is opted out.
///
/// The flag is atomic so the host can flip it from a settings screen on any
/// thread while the bridge keeps tracking on the UI thread.
pub struct OptOutTracker<T> {
    inner: T,
    opted_out: AtomicBool,
}

impl<T: EventTracker> OptOutTracker<T> {
    /// Wraps `inner` with tracking enabled.
    pub fn new(inner: T) -> Self {
        Self::with_state(inner, false)
    }

    /// Wraps `inner` with an initial opt-out state read from host storage.
    pub fn with_state(inner: T, opted_out: bool) -> Self {
        Self {
            inner,
            opted_out: AtomicBool::new(opted_out),
        }
    }

    pub fn opt_out(&self) {
        self.opted_out.store(true, Ordering::Release);
    }

    pub fn opt_in(&self) {
        self.opted_out.store(false, Ordering::Release);
    }

    pub fn is_opted_out(&self) -> bool {
        self.opted_out.load(Ordering::Acquire)
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: EventTracker> EventTracker for OptOutTracker<T> {
    fn track(&self, event: TrackEvent) {
        if self.is_opted_out() {
            debug!(event = %event.name, "opted out; event dropped");
            return;
        }
        self.inner.track(event);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
