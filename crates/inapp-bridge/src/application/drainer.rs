//! OutboundQueueDrainer: moves queued payloads into the template.
//!
//! Payloads destined for the template (message content fetched in the
//! background, for example) are produced elsewhere and parked in a queue the
//! host owns.  The drainer pulls them one at a time and hands each to the
//! template as a `handleResponseData` call.
//!
//! # Readiness gate
//!
//! The template can only accept data after it reports `initialized`.  Before
//! that the drainer does nothing at all (not even a pull), so nothing is lost:
//! the payloads stay in the queue until the next drain after `Ready`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::codec;
use crate::application::host::ContentSurface;
use crate::application::state_machine::BridgeStateMachine;

/// Source of outbound payloads.
///
/// The adapter exclusively owns the queue contents; the bridge only pulls.
/// Producers may run on other threads, so `dequeue` must be thread-safe.
#[cfg_attr(test, mockall::automock)]
pub trait MessageQueueAdapter: Send + Sync {
    /// Removes and returns the next payload, or `None` when empty.
    fn dequeue(&self) -> Option<String>;
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Items taken from the adapter.
    pub pulled: usize,
    /// Items handed to the surface.
    pub delivered: usize,
    /// `true` if a delivery failed and the pass stopped early.
    pub aborted: bool,
}

/// Pulls from a [`MessageQueueAdapter`] and delivers into a surface.
pub struct OutboundQueueDrainer {
    queue: Arc<dyn MessageQueueAdapter>,
}

impl OutboundQueueDrainer {
    pub fn new(queue: Arc<dyn MessageQueueAdapter>) -> Self {
        Self { queue }
    }

    /// Drains the queue to exhaustion if `state` allows delivery.
    ///
    /// Items are delivered in the order the adapter yields them, one script
    /// call per item.  If the surface refuses a script the pass stops there;
    /// that item has already left the queue and is dropped.
    pub fn drain<S>(&self, state: &BridgeStateMachine, surface: &mut S) -> DrainReport
    where
        S: ContentSurface + ?Sized,
    {
        let mut report = DrainReport::default();
        if !state.can_deliver() {
            debug!(state = %state.state(), "drain deferred until ready");
            return report;
        }

        while let Some(payload) = self.queue.dequeue() {
            report.pulled += 1;
            if let Err(err) = surface.evaluate_script(&codec::handoff_script(&payload)) {
                warn!(%err, delivered = report.delivered, "outbound delivery failed; drain aborted");
                report.aborted = true;
                break;
            }
            report.delivered += 1;
        }
        report
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
