//! In-memory surface and parent for tests and tooling.
//!
//! # Why recording implementations?
//!
//! A real content surface is a platform web view: it needs a device or an
//! emulator, renders asynchronously, and cannot be inspected from Rust.
//! [`RecordingSurface`] replaces it with plain vectors so callers can see
//! exactly which documents were loaded and which scripts were sent, in order.
//! [`RecordingParent`] does the same for the host callbacks.
//!
//! The replay tool (`inapp-replay`) runs the real controller against these,
//! which lets template authors check bridge behaviour without a device.
//!
//! # `reject_scripts` flag
//!
//! Set `reject_scripts = true` to make every `evaluate_script` fail, for
//! exercising the drain-abort path.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::application::host::{ContentSurface, ParentCallback, SurfaceError};
use crate::domain::messages::TouchableRegion;

/// History entry recorded for inline markup loads.
const MARKUP_HISTORY_ENTRY: &str = "data:text/html";

/// A content surface that records every call.
///
/// History behaves like a platform web view: every load pushes an entry and
/// going back is possible while more than one entry exists.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// URLs passed to `load_url`, in order.
    pub loaded_urls: Vec<String>,
    /// Markup passed to `load_markup`, in order.
    pub loaded_markup: Vec<String>,
    /// Scripts accepted by `evaluate_script`, in order.
    pub scripts: Vec<String>,
    /// Number of `destroy` calls.
    pub destroy_count: usize,
    /// When `true`, `evaluate_script` returns [`SurfaceError::Rejected`].
    pub reject_scripts: bool,
    history: Vec<String>,
    released: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current back-stack depth.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl ContentSurface for RecordingSurface {
    fn load_url(&mut self, url: &str) {
        self.loaded_urls.push(url.to_owned());
        self.history.push(url.to_owned());
    }

    fn load_markup(&mut self, markup: &str) {
        self.loaded_markup.push(markup.to_owned());
        self.history.push(MARKUP_HISTORY_ENTRY.to_owned());
    }

    fn evaluate_script(&mut self, script: &str) -> Result<(), SurfaceError> {
        if self.released {
            return Err(SurfaceError::Released);
        }
        if self.reject_scripts {
            return Err(SurfaceError::Rejected("recording surface set to reject".into()));
        }
        self.scripts.push(script.to_owned());
        Ok(())
    }

    fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    fn go_back(&mut self) {
        if self.can_go_back() {
            self.history.pop();
        }
    }

    fn destroy(&mut self) {
        self.destroy_count += 1;
        self.released = true;
        self.history.clear();
    }
}

/// One call received by a [`RecordingParent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum ParentCall {
    OpenUrl { url: String },
    UpdateTouchableRegions { regions: Vec<TouchableRegion> },
    Show,
    Dismiss,
    ErrorOccurred,
}

/// A parent callback that records every call.
#[derive(Debug, Default)]
pub struct RecordingParent {
    calls: Mutex<Vec<ParentCall>>,
}

impl RecordingParent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far, in order.
    pub fn calls(&self) -> Vec<ParentCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: &ParentCall) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| *c == call)
            .count()
    }

    fn record(&self, call: ParentCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl ParentCallback for RecordingParent {
    fn open_url(&self, url: &str) {
        self.record(ParentCall::OpenUrl { url: url.to_owned() });
    }

    fn update_touchable_regions(&self, regions: &[TouchableRegion]) {
        self.record(ParentCall::UpdateTouchableRegions {
            regions: regions.to_vec(),
        });
    }

    fn show(&self) {
        self.record(ParentCall::Show);
    }

    fn dismiss(&self) {
        self.record(ParentCall::Dismiss);
    }

    fn error_occurred(&self) {
        self.record(ParentCall::ErrorOccurred);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
