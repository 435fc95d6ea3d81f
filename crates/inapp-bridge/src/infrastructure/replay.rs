//! JSON-lines replay of bridge traffic against in-memory host doubles.
//!
//! A replay script is a text file with one JSON object per line.  Each object
//! is a step with a `"step"` discriminant:
//!
//! ```text
//! {"step":"load","url":"https://cf-native.karte.io/v0/native/overlay"}
//! {"step":"enqueue","payload":{"messages":[]}}
//! {"step":"inbound","message":{"name":"state_changed","data":{"state":"initialized"}}}
//! {"step":"inbound","message":"this text is not json"}
//! {"step":"fail","failure":{"channel":"http","url":"https://example.com/","status":500}}
//! {"step":"notify"}
//! {"step":"back"}
//! {"step":"close"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  `inbound.message`
//! and `enqueue.payload` may be either a JSON string (used verbatim, which is
//! how malformed input is replayed) or any other JSON value (serialized).
//!
//! The session runs the real [`ContentSurfaceController`] over a
//! [`RecordingSurface`] and [`RecordingParent`], then reports everything they
//! saw as a [`ReplaySummary`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use tracker_core::{EventTracker, OptOutTracker, RecordingTracker, TrackEvent, TracingTracker};

use crate::application::controller::{Collaborators, ContentSurfaceController};
use crate::domain::config::BridgeConfig;
use crate::domain::failure::LoadFailure;
use crate::domain::state::SurfaceState;
use crate::infrastructure::channel_queue::{ChannelQueue, QueueSender};
use crate::infrastructure::recording::{ParentCall, RecordingParent, RecordingSurface};

/// Errors from reading replay input.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A script line is not a valid step.
    #[error("line {line}: {source}")]
    Step {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration TOML could not be parsed.
    #[error("failed to parse replay config: {0}")]
    Config(#[from] toml::de::Error),
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Settings for one replay run.
///
/// ```toml
/// log_level = "debug"
/// opt_out = false
///
/// [bridge]
/// cache_enabled = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Start with tracking opted out.
    #[serde(default)]
    pub opt_out: bool,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            opt_out: false,
            bridge: BridgeConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Parses a TOML document; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Config`] if the text is not valid TOML for this
    /// schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ReplayError> {
        Ok(toml::from_str(text)?)
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// One replay step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Host loads a document.
    Load { url: String },
    /// Template posts a message.
    Inbound { message: Value },
    /// A producer queues an outbound payload.
    Enqueue { payload: Value },
    /// Host signals that the queue changed.
    Notify,
    /// Surface reports a failed load.
    Fail { failure: LoadFailure },
    /// User presses back.
    Back,
    /// Message is closed (reset or destroy per `cache_enabled`).
    Close,
}

/// Parses a JSON-lines replay script.
///
/// # Errors
///
/// Returns [`ReplayError::Step`] with the 1-based line number of the first
/// line that is not a valid step.
pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ReplayError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, content)| {
            serde_json::from_str(content).map_err(|source| ReplayError::Step { line, source })
        })
        .collect()
}

/// Strings are used as-is; other values are serialized.
fn as_wire_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Records events and also logs them.
#[derive(Debug, Default)]
pub struct ReplayTracker {
    recorded: RecordingTracker,
}

impl ReplayTracker {
    pub fn events(&self) -> Vec<TrackEvent> {
        self.recorded.events()
    }
}

impl EventTracker for ReplayTracker {
    fn track(&self, event: TrackEvent) {
        TracingTracker.track(event.clone());
        self.recorded.track(event);
    }
}

/// Everything observed during a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub final_state: SurfaceState,
    pub current_url: Option<String>,
    pub loaded_urls: Vec<String>,
    pub loaded_markup: Vec<String>,
    pub scripts: Vec<String>,
    pub destroy_count: usize,
    pub back_results: Vec<bool>,
    pub parent_calls: Vec<ParentCall>,
    pub events: Vec<TrackEvent>,
}

/// One controller wired to in-memory host doubles.
pub struct ReplaySession {
    controller: ContentSurfaceController<RecordingSurface>,
    parent: Arc<RecordingParent>,
    tracker: Arc<OptOutTracker<ReplayTracker>>,
    sender: QueueSender,
    cache_enabled: bool,
    back_results: Vec<bool>,
}

impl ReplaySession {
    pub fn new(config: &ReplayConfig) -> Self {
        let (queue, sender) = ChannelQueue::new();
        let parent = Arc::new(RecordingParent::new());
        let tracker = Arc::new(OptOutTracker::with_state(
            ReplayTracker::default(),
            config.opt_out,
        ));
        let collaborators = Collaborators {
            parent: parent.clone(),
            tracker: tracker.clone(),
            queue: Arc::new(queue),
        };
        Self {
            controller: ContentSurfaceController::new(
                RecordingSurface::new(),
                config.bridge.clone(),
                collaborators,
            ),
            parent,
            tracker,
            sender,
            cache_enabled: config.bridge.cache_enabled,
            back_results: Vec::new(),
        }
    }

    pub fn run(&mut self, steps: &[ReplayStep]) {
        for (index, step) in steps.iter().enumerate() {
            debug!(step = index + 1, ?step, "replaying");
            self.apply(step);
        }
    }

    pub fn apply(&mut self, step: &ReplayStep) {
        match step {
            ReplayStep::Load { url } => self.controller.load(url),
            ReplayStep::Inbound { message } => {
                self.controller.handle_raw_message(&as_wire_text(message))
            }
            ReplayStep::Enqueue { payload } => {
                self.sender.push(as_wire_text(payload));
            }
            ReplayStep::Notify => {
                self.controller.notify_changed();
            }
            ReplayStep::Fail { failure } => self.controller.handle_load_failure(failure),
            ReplayStep::Back => {
                let handled = self.controller.dispatch_back_navigation();
                self.back_results.push(handled);
            }
            ReplayStep::Close => self.controller.reset_or_destroy(self.cache_enabled),
        }
    }

    pub fn controller(&self) -> &ContentSurfaceController<RecordingSurface> {
        &self.controller
    }

    pub fn summary(&self) -> ReplaySummary {
        let surface = self.controller.surface();
        ReplaySummary {
            final_state: self.controller.state(),
            current_url: self.controller.current_url().map(str::to_owned),
            loaded_urls: surface.loaded_urls.clone(),
            loaded_markup: surface.loaded_markup.clone(),
            scripts: surface.scripts.clone(),
            destroy_count: surface.destroy_count,
            back_results: self.back_results.clone(),
            parent_calls: self.parent.calls(),
            events: self.tracker.inner().events(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
