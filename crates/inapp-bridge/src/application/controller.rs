//! ContentSurfaceController: the bridge's public face.
//!
//! One controller owns one content surface for its whole life.  It is the
//! only writer of the surface's [`BridgeStateMachine`] and of the URL most
//! recently loaded into it, and it is the object the host talks to:
//!
//! ```text
//! host ── load / notify_changed / back / load failure / close ──▶ controller
//! template ── raw JSON string ──▶ controller ── decode ──▶ dispatch
//!                                     │
//!          ┌──────────────┬───────────┼──────────────┬──────────────┐
//!          ▼              ▼           ▼              ▼              ▼
//!    state machine     tracker   parent.open_url  parent.update_  parent.show /
//!    (+ drain on Ready)                           touchable_...   parent.dismiss
//! ```
//!
//! # Failure policy
//!
//! Nothing in here returns an error to the host.  Malformed messages are
//! logged and dropped, load failures end in a blank page and/or a single
//! `error_occurred`, and anything attempted after `Destroyed` is ignored.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tracker_core::{EventTracker, TrackEvent};

use crate::application::codec::{self, BridgeError};
use crate::application::drainer::{DrainReport, MessageQueueAdapter, OutboundQueueDrainer};
use crate::application::error_classifier::{classify_failure, FailureSeverity};
use crate::application::host::{ContentSurface, ParentCallback};
use crate::application::state_machine::{BridgeStateMachine, Transition};
use crate::domain::config::BridgeConfig;
use crate::domain::failure::LoadFailure;
use crate::domain::messages::{InboundMessage, StateChange, TouchableRegion, Visibility};
use crate::domain::state::SurfaceState;

/// Identifies one controller in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The host-supplied objects a controller forwards to.
///
/// Cloning is cheap (three `Arc` clones), so a [`super::SurfaceCache`]
/// factory can build any number of controllers from one set.
#[derive(Clone)]
pub struct Collaborators {
    pub parent: Arc<dyn ParentCallback>,
    pub tracker: Arc<dyn EventTracker>,
    pub queue: Arc<dyn MessageQueueAdapter>,
}

/// Drives one content surface.
pub struct ContentSurfaceController<S: ContentSurface> {
    id: SurfaceId,
    surface: S,
    state: BridgeStateMachine,
    loaded_url: Option<String>,
    released: bool,
    config: BridgeConfig,
    drainer: OutboundQueueDrainer,
    parent: Arc<dyn ParentCallback>,
    tracker: Arc<dyn EventTracker>,
}

impl<S: ContentSurface> ContentSurfaceController<S> {
    /// Takes ownership of `surface`.  The controller starts in `Loading`
    /// with nothing loaded.
    pub fn new(surface: S, config: BridgeConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            parent,
            tracker,
            queue,
        } = collaborators;
        let id = SurfaceId::generate();
        debug!(surface = %id, "controller created");
        Self {
            id,
            surface,
            state: BridgeStateMachine::new(),
            loaded_url: None,
            released: false,
            config,
            drainer: OutboundQueueDrainer::new(queue),
            parent,
            tracker,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn state(&self) -> SurfaceState {
        self.state.state()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.is_destroyed()
    }

    /// URL most recently passed to [`Self::load`].
    pub fn current_url(&self) -> Option<&str> {
        self.loaded_url.as_deref()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    // ── Host-driven operations ────────────────────────────────────────────────

    /// Loads `url` into the surface and records it as the current document.
    pub fn load(&mut self, url: &str) {
        if self.skip_when_destroyed("load") {
            return;
        }
        info!(surface = %self.id, url, "loading document");
        self.surface.load_url(url);
        self.loaded_url = Some(url.to_owned());
    }

    /// Tells the controller that the outbound queue may have new items.
    ///
    /// Drains immediately when `Ready`; otherwise does nothing and the items
    /// wait for the `Loading → Ready` drain.
    pub fn notify_changed(&mut self) -> DrainReport {
        if self.state.is_destroyed() {
            debug!(surface = %self.id, "surface destroyed; drain ignored");
            return DrainReport::default();
        }
        self.drain()
    }

    /// Handles a back key press.
    ///
    /// Returns `true` if the surface navigated back.  `false` tells the host
    /// to treat the key as unhandled (usually by closing the message).
    pub fn dispatch_back_navigation(&mut self) -> bool {
        if self.skip_when_destroyed("back navigation") || !self.surface.can_go_back() {
            return false;
        }
        self.surface.go_back();
        true
    }

    /// Applies the failure rules to a load failure reported by the surface.
    pub fn handle_load_failure(&mut self, failure: &LoadFailure) {
        if self.skip_when_destroyed("load failure") {
            return;
        }
        let classification = classify_failure(
            failure,
            self.loaded_url.as_deref(),
            &self.config.overlay_endpoint,
        );
        let Some(severity) = classification.severity() else {
            debug!(surface = %self.id, url = failure.url(), channel = failure.channel(), "sub-resource failure ignored");
            return;
        };

        match severity {
            FailureSeverity::Benign => {
                info!(surface = %self.id, url = failure.url(), channel = failure.channel(), "document failed to load")
            }
            FailureSeverity::Fatal => {
                warn!(surface = %self.id, url = failure.url(), channel = failure.channel(), "message content failed to load")
            }
        }
        if classification.replace_with_blank {
            self.surface.load_markup(&self.config.blank_document);
        }
        if classification.report_to_parent {
            self.parent.error_occurred();
        }
    }

    /// Called when the message is no longer shown.
    ///
    /// With `cache_enabled` the template is reset and the surface stays alive
    /// for reuse.  Without it the surface is released and the controller
    /// becomes `Destroyed`.
    pub fn reset_or_destroy(&mut self, cache_enabled: bool) {
        if cache_enabled {
            if self.skip_when_destroyed("reset") {
                return;
            }
            debug!(surface = %self.id, "resetting page state for reuse");
            if let Err(err) = self.surface.evaluate_script(&codec::reset_script()) {
                warn!(surface = %self.id, %err, "reset call not delivered");
            }
        } else {
            self.release();
        }
    }

    // ── Template-driven operations ────────────────────────────────────────────

    /// Entry point for every string the template posts.
    pub fn handle_raw_message(&mut self, raw: &str) {
        match self.receive(raw) {
            Ok(()) => {}
            Err(BridgeError::SurfaceDestroyed) => {
                debug!(surface = %self.id, "surface destroyed; inbound message ignored")
            }
            Err(err @ BridgeError::MalformedMessage(_)) => {
                warn!(surface = %self.id, %err, "inbound message dropped")
            }
        }
    }

    /// Routes an already-decoded message to its handler.
    pub fn handle_message(&mut self, message: InboundMessage) {
        if self.skip_when_destroyed("inbound message") {
            return;
        }
        self.dispatch(message);
    }

    /// Forwards a `visible` request to the host.
    pub fn show_message(&mut self) {
        if !self.skip_when_destroyed("show") {
            self.parent.show();
        }
    }

    /// Forwards an `invisible` request to the host.
    pub fn dismiss_message(&mut self) {
        if !self.skip_when_destroyed("dismiss") {
            self.parent.dismiss();
        }
    }

    /// Forwards the template's touchable regions to the host, unmodified.
    pub fn update_touchable_regions(&mut self, regions: &[TouchableRegion]) {
        if !self.skip_when_destroyed("touchable regions") {
            self.parent.update_touchable_regions(regions);
        }
    }

    /// Asks the host to open `url` outside the surface.
    pub fn open_external_url(&mut self, url: &str) {
        if !self.skip_when_destroyed("open url") {
            info!(surface = %self.id, url, "opening external url");
            self.parent.open_url(url);
        }
    }

    /// Tracks a template-raised event.
    pub fn emit_event(&mut self, name: String, values: Map<String, Value>) {
        if !self.skip_when_destroyed("event") {
            self.tracker.track(TrackEvent::new(name, values));
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn receive(&mut self, raw: &str) -> Result<(), BridgeError> {
        if self.state.is_destroyed() {
            return Err(BridgeError::SurfaceDestroyed);
        }
        let message = codec::decode_inbound(raw)?;
        self.dispatch(message);
        Ok(())
    }

    fn dispatch(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::StateChanged(change) => self.on_state_changed(change),
            InboundMessage::Event { event_name, values } => self.emit_event(event_name, values),
            InboundMessage::OpenUrl { url } => self.open_external_url(&url),
            InboundMessage::DocumentChanged { touchable_regions } => {
                self.update_touchable_regions(&touchable_regions)
            }
            InboundMessage::Visibility(Visibility::Visible) => self.show_message(),
            InboundMessage::Visibility(Visibility::Invisible) => self.dismiss_message(),
            InboundMessage::Visibility(Visibility::Other(state)) => {
                debug!(surface = %self.id, %state, "unknown visibility state ignored")
            }
            InboundMessage::Unknown { name } => {
                debug!(surface = %self.id, %name, "unknown message ignored")
            }
        }
    }

    fn on_state_changed(&mut self, change: StateChange) {
        match change {
            StateChange::Initialized => {
                let ready = self
                    .state
                    .mark_initialized()
                    .filter(Transition::became_ready);
                if let Some(transition) = ready {
                    info!(surface = %self.id, from = %transition.from, to = %transition.to, "template ready");
                    self.drain();
                }
            }
            StateChange::Error { message } => {
                let detail = message.unwrap_or_default();
                warn!(surface = %self.id, %detail, "template reported an error");
                self.state.mark_failed();
            }
            StateChange::Other(state) => {
                debug!(surface = %self.id, %state, "unknown template state ignored")
            }
        }
    }

    fn drain(&mut self) -> DrainReport {
        let report = self.drainer.drain(&self.state, &mut self.surface);
        if report.pulled > 0 {
            debug!(
                surface = %self.id,
                delivered = report.delivered,
                aborted = report.aborted,
                "outbound queue drained"
            );
        }
        report
    }

    fn release(&mut self) {
        if !self.released {
            info!(surface = %self.id, "releasing surface");
            self.surface.destroy();
            self.released = true;
        }
        self.state.destroy();
    }

    /// Logs and returns `true` when the controller is past `Destroyed`.
    fn skip_when_destroyed(&self, operation: &'static str) -> bool {
        let destroyed = self.state.is_destroyed();
        if destroyed {
            debug!(surface = %self.id, operation, "surface destroyed; ignored");
        }
        destroyed
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::host::MockParentCallback;
    use crate::domain::config::BLANK_DOCUMENT;
    use crate::infrastructure::channel_queue::{ChannelQueue, QueueSender};
    use crate::infrastructure::recording::RecordingSurface;
    use serde_json::json;
    use tracker_core::RecordingTracker;

    const INITIALIZED: &str = r#"{"name":"state_changed","data":{"state":"initialized"}}"#;

    struct Harness {
        controller: ContentSurfaceController<RecordingSurface>,
        sender: QueueSender,
        tracker: Arc<RecordingTracker>,
    }

    fn harness(parent: MockParentCallback) -> Harness {
        let (queue, sender) = ChannelQueue::new();
        let tracker = Arc::new(RecordingTracker::new());
        let collaborators = Collaborators {
            parent: Arc::new(parent),
            tracker: tracker.clone(),
            queue: Arc::new(queue),
        };
        Harness {
            controller: ContentSurfaceController::new(
                RecordingSurface::new(),
                BridgeConfig::default(),
                collaborators,
            ),
            sender,
            tracker,
        }
    }

    /// A parent that fails the test on any call.
    fn silent_parent() -> MockParentCallback {
        MockParentCallback::new()
    }

    // ── State and drain ───────────────────────────────────────────────────────

    #[test]
    fn test_initialized_message_makes_controller_ready() {
        let mut h = harness(silent_parent());

        h.controller.handle_raw_message(INITIALIZED);

        assert_eq!(h.controller.state(), SurfaceState::Ready);
    }

    #[test]
    fn test_items_queued_while_loading_are_drained_on_ready() {
        // Arrange
        let mut h = harness(silent_parent());
        h.sender.push("first");
        h.sender.push("second");

        // Act: notify before ready does nothing
        let early = h.controller.notify_changed();
        h.controller.handle_raw_message(INITIALIZED);

        // Assert
        assert_eq!(early.pulled, 0);
        assert_eq!(
            h.controller.surface().scripts,
            vec![codec::handoff_script("first"), codec::handoff_script("second")]
        );
    }

    #[test]
    fn test_duplicate_initialized_does_not_redrain() {
        let mut h = harness(silent_parent());
        h.controller.handle_raw_message(INITIALIZED);
        h.sender.push("late");

        // A second `initialized` is a no-op, so "late" waits for notify_changed.
        h.controller.handle_raw_message(INITIALIZED);
        assert!(h.controller.surface().scripts.is_empty());

        let report = h.controller.notify_changed();
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn test_error_state_destroys_and_blocks_drain() {
        let mut h = harness(silent_parent());
        h.controller.handle_raw_message(INITIALIZED);

        h.controller.handle_raw_message(
            r#"{"name":"state_changed","data":{"state":"error","message":"render failed"}}"#,
        );
        h.sender.push("never delivered");
        let report = h.controller.notify_changed();

        assert_eq!(h.controller.state(), SurfaceState::Destroyed);
        assert_eq!(report, DrainReport::default());
        // Error state alone does not release the renderer.
        assert_eq!(h.controller.surface().destroy_count, 0);
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn test_visibility_messages_forward_show_and_dismiss() {
        // Arrange
        let mut parent = MockParentCallback::new();
        parent.expect_show().times(1).return_const(());
        parent.expect_dismiss().times(1).return_const(());
        let mut h = harness(parent);

        // Act
        h.controller.handle_raw_message(r#"{"name":"visibility","data":{"state":"visible"}}"#);
        h.controller.handle_raw_message(r#"{"name":"visibility","data":{"state":"invisible"}}"#);
    }

    #[test]
    fn test_open_url_forwards_url_verbatim() {
        let url = "https://example.com/landing?utm_source=iam&x=%20y";
        let mut parent = MockParentCallback::new();
        parent
            .expect_open_url()
            .withf(move |u| u == url)
            .times(1)
            .return_const(());
        let mut h = harness(parent);

        h.controller
            .handle_raw_message(&json!({"name": "open_url", "data": {"url": url}}).to_string());
    }

    #[test]
    fn test_document_changed_forwards_regions_in_order() {
        let mut parent = MockParentCallback::new();
        parent
            .expect_update_touchable_regions()
            .withf(|regions| {
                regions.len() == 2 && regions[0].top == 0.0 && regions[1].top == 100.0
            })
            .times(1)
            .return_const(());
        let mut h = harness(parent);

        h.controller.handle_raw_message(
            r#"{"name":"document_changed","data":{"touchable_regions":[
                {"top":0,"bottom":50,"left":0,"right":320},
                {"top":100,"bottom":150,"left":10,"right":310}
            ]}}"#,
        );
    }

    #[test]
    fn test_event_message_is_tracked() {
        let mut h = harness(silent_parent());

        h.controller.handle_raw_message(
            r#"{"name":"event","data":{"event_name":"message_click","values":{"campaign_id":"c1"}}}"#,
        );

        let events = h.tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "message_click");
        assert_eq!(events[0].values["campaign_id"], "c1");
    }

    #[test]
    fn test_unknown_and_malformed_messages_have_no_effect() {
        // Arrange: silent parent panics on any call
        let mut h = harness(silent_parent());

        // Act
        h.controller.handle_raw_message(r#"{"name":"new_feature","data":{"x":1}}"#);
        h.controller.handle_raw_message("garbage");
        h.controller.handle_raw_message(r#"{"name":"open_url","data":{}}"#);

        // Assert
        assert_eq!(h.controller.state(), SurfaceState::Loading);
        assert!(h.tracker.is_empty());
    }

    #[test]
    fn test_messages_after_destroy_are_ignored() {
        let mut h = harness(silent_parent());
        h.controller.reset_or_destroy(false);

        h.controller.handle_raw_message(r#"{"name":"visibility","data":{"state":"visible"}}"#);
        h.controller.handle_raw_message(INITIALIZED);

        assert_eq!(h.controller.state(), SurfaceState::Destroyed);
    }

    #[test]
    fn test_handle_message_routes_typed_messages() {
        // Arrange
        let mut parent = MockParentCallback::new();
        parent.expect_show().times(1).return_const(());
        parent
            .expect_open_url()
            .withf(|u| u == "https://example.com/x")
            .times(1)
            .return_const(());
        let mut h = harness(parent);
        h.sender.push("queued");

        // Act
        h.controller.handle_message(InboundMessage::StateChanged(StateChange::Initialized));
        h.controller.handle_message(InboundMessage::Visibility(Visibility::Visible));
        h.controller.handle_message(InboundMessage::OpenUrl {
            url: "https://example.com/x".into(),
        });
        h.controller.handle_message(InboundMessage::Event {
            event_name: "message_open".into(),
            values: Map::new(),
        });
        h.controller.handle_message(InboundMessage::Unknown {
            name: "carousel_swiped".into(),
        });

        // Assert
        assert_eq!(h.controller.state(), SurfaceState::Ready);
        assert_eq!(
            h.controller.surface().scripts,
            vec![codec::handoff_script("queued")]
        );
        assert_eq!(h.tracker.len(), 1);
    }

    #[test]
    fn test_handle_message_after_destroy_is_ignored() {
        // Arrange: silent parent panics on any call
        let mut h = harness(silent_parent());
        h.controller.reset_or_destroy(false);
        h.sender.push("never delivered");

        // Act
        h.controller.handle_message(InboundMessage::StateChanged(StateChange::Initialized));
        h.controller.handle_message(InboundMessage::Visibility(Visibility::Visible));
        h.controller.handle_message(InboundMessage::DocumentChanged {
            touchable_regions: vec![],
        });
        h.controller.handle_message(InboundMessage::Event {
            event_name: "message_open".into(),
            values: Map::new(),
        });

        // Assert
        assert_eq!(h.controller.state(), SurfaceState::Destroyed);
        assert!(h.controller.surface().scripts.is_empty());
        assert!(h.tracker.is_empty());
    }

    // ── Load and failures ─────────────────────────────────────────────────────

    #[test]
    fn test_load_records_current_url() {
        let mut h = harness(silent_parent());

        h.controller.load("https://example.com/a");
        h.controller.load("https://example.com/b");

        assert_eq!(h.controller.current_url(), Some("https://example.com/b"));
        assert_eq!(h.controller.surface().loaded_urls.len(), 2);
    }

    #[test]
    fn test_failure_of_current_document_loads_blank_without_reporting() {
        let mut h = harness(silent_parent());
        h.controller.load("https://example.com/a");

        h.controller.handle_load_failure(&LoadFailure::Http {
            url: "https://example.com/a".into(),
            status: 404,
        });

        assert_eq!(h.controller.surface().loaded_markup, vec![BLANK_DOCUMENT.to_string()]);
    }

    #[test]
    fn test_failure_of_overlay_endpoint_reports_once() {
        let mut parent = MockParentCallback::new();
        parent.expect_error_occurred().times(1).return_const(());
        let mut h = harness(parent);
        h.controller.load("https://example.com/a");
        let overlay = h.controller.config().overlay_endpoint.clone();

        h.controller.handle_load_failure(&LoadFailure::Ssl { url: overlay });

        assert!(h.controller.surface().loaded_markup.is_empty());
    }

    #[test]
    fn test_unrelated_failure_does_nothing() {
        let mut h = harness(silent_parent());
        h.controller.load("https://example.com/a");

        h.controller.handle_load_failure(&LoadFailure::Network {
            url: "https://cdn.example.com/font.woff".into(),
            description: "connection reset".into(),
        });

        assert!(h.controller.surface().loaded_markup.is_empty());
    }

    // ── Back navigation ───────────────────────────────────────────────────────

    #[test]
    fn test_back_navigation_without_history_is_unhandled() {
        let mut h = harness(silent_parent());
        assert!(!h.controller.dispatch_back_navigation());
    }

    #[test]
    fn test_back_navigation_walks_history_then_stops() {
        let mut h = harness(silent_parent());
        h.controller.load("https://example.com/1");
        h.controller.load("https://example.com/2");
        h.controller.load("https://example.com/3");

        assert!(h.controller.dispatch_back_navigation());
        assert!(h.controller.dispatch_back_navigation());
        assert!(!h.controller.dispatch_back_navigation());
    }

    // ── Reset / destroy ───────────────────────────────────────────────────────

    #[test]
    fn test_reset_with_cache_sends_one_reset_and_keeps_surface() {
        // Arrange
        let mut h = harness(silent_parent());
        h.controller.handle_raw_message(INITIALIZED);

        // Act
        h.controller.reset_or_destroy(true);

        // Assert
        assert_eq!(h.controller.surface().scripts, vec![codec::reset_script()]);
        assert_eq!(h.controller.surface().destroy_count, 0);
        assert_eq!(h.controller.state(), SurfaceState::Ready);
    }

    #[test]
    fn test_destroy_without_cache_sends_nothing_and_releases_once() {
        let mut h = harness(silent_parent());

        h.controller.reset_or_destroy(false);
        h.controller.reset_or_destroy(false);

        assert!(h.controller.surface().scripts.is_empty());
        assert_eq!(h.controller.surface().destroy_count, 1);
        assert!(h.controller.is_destroyed());
    }

    #[test]
    fn test_failed_delivery_drops_one_item_and_the_rest_arrive_next_drain() {
        // Arrange
        let mut h = harness(silent_parent());
        h.controller.handle_raw_message(INITIALIZED);
        for payload in ["a", "b", "c"] {
            h.sender.push(payload);
        }
        h.controller.surface.reject_scripts = true;

        // Act
        let first = h.controller.notify_changed();
        h.controller.surface.reject_scripts = false;
        let second = h.controller.notify_changed();

        // Assert
        assert_eq!(
            first,
            DrainReport {
                pulled: 1,
                delivered: 0,
                aborted: true
            }
        );
        assert_eq!(
            second,
            DrainReport {
                pulled: 2,
                delivered: 2,
                aborted: false
            }
        );
        assert_eq!(
            h.controller.surface().scripts,
            vec![codec::handoff_script("b"), codec::handoff_script("c")]
        );
    }

    #[test]
    fn test_error_with_non_string_message_still_destroys() {
        let mut h = harness(silent_parent());

        h.controller.handle_raw_message(
            r#"{"name":"state_changed","data":{"state":"error","message":{"code":500}}}"#,
        );

        assert_eq!(h.controller.state(), SurfaceState::Destroyed);
    }

    #[test]
    fn test_error_destroyed_surface_is_still_released_on_close() {
        let mut h = harness(silent_parent());
        h.controller.handle_raw_message(r#"{"name":"state_changed","data":{"state":"error"}}"#);

        h.controller.reset_or_destroy(false);

        assert_eq!(h.controller.surface().destroy_count, 1);
    }
}
