//! JSON message types for the template-facing bridge protocol.
//!
//! The template script running inside the content surface talks to native
//! code by posting one JSON string per message.  Every message is a named
//! envelope:
//!
//! ```json
//! {"name":"state_changed","data":{"state":"initialized"}}
//! {"name":"event","data":{"event_name":"message_click","values":{"url":"..."}}}
//! {"name":"open_url","data":{"url":"https://example.com/?utm_source=iam"}}
//! {"name":"document_changed","data":{"touchable_regions":[{"top":0,"bottom":40,"left":0,"right":320}]}}
//! {"name":"visibility","data":{"state":"visible"}}
//! ```
//!
//! # Two levels of typing
//!
//! [`BridgeMessage`] is the raw envelope: a name and a free-form JSON object.
//! Decoding into it only fails when the text is not a JSON object with a
//! `name` field.  [`InboundMessage`] is the typed view with one variant per
//! known message shape, plus [`InboundMessage::Unknown`] so that templates
//! newer than this SDK can send messages it does not understand without
//! breaking anything.
//!
//! The `*Data` structs describe the `data` object of each known message and
//! are what the codec deserializes into.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire names of the inbound messages this SDK understands.
pub mod names {
    pub const STATE_CHANGED: &str = "state_changed";
    pub const EVENT: &str = "event";
    pub const OPEN_URL: &str = "open_url";
    pub const DOCUMENT_CHANGED: &str = "document_changed";
    pub const VISIBILITY: &str = "visibility";
}

// ── Raw envelope ──────────────────────────────────────────────────────────────

/// A named message envelope exactly as it crosses the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeMessage {
    /// Message type discriminant.
    pub name: String,
    /// Message payload.  Absent `data` is read as an empty object.
    #[serde(default)]
    pub data: Map<String, Value>,
}

// ── Typed inbound messages ────────────────────────────────────────────────────

/// A decoded inbound message, one variant per message shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// The template reports a lifecycle change.
    StateChanged(StateChange),

    /// The template asks native code to track an event.
    Event {
        event_name: String,
        values: Map<String, Value>,
    },

    /// The template asks the host to open a URL outside the surface.
    OpenUrl { url: String },

    /// The template's layout changed; these are the areas that take touches.
    DocumentChanged {
        touchable_regions: Vec<TouchableRegion>,
    },

    /// The template wants the message shown or hidden.
    Visibility(Visibility),

    /// A message name this SDK does not know.  Ignored by the controller.
    Unknown { name: String },
}

/// The `state` carried by a `state_changed` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// The template finished booting and can accept data.
    Initialized,
    /// The template failed; the optional text is for logs only.
    Error { message: Option<String> },
    /// Any other state string, kept for logging.
    Other(String),
}

/// The `state` carried by a `visibility` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Invisible,
    /// Any other state string, kept for logging.
    Other(String),
}

/// A touch-receiving rectangle in surface-local coordinates.
///
/// The host uses these to decide which touches go to the message and which
/// fall through to the app underneath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchableRegion {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

// ── Per-message `data` schemas ────────────────────────────────────────────────

/// `data` of `state_changed`.
#[derive(Debug, Deserialize)]
pub struct StateChangedData {
    pub state: String,
    /// Only logged, so any JSON value is accepted.
    #[serde(default)]
    pub message: Option<Value>,
}

/// `data` of `event`.
#[derive(Debug, Deserialize)]
pub struct EventData {
    pub event_name: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

/// `data` of `open_url`.
#[derive(Debug, Deserialize)]
pub struct OpenUrlData {
    pub url: String,
}

/// `data` of `document_changed`.
#[derive(Debug, Deserialize)]
pub struct DocumentChangedData {
    pub touchable_regions: Vec<TouchableRegion>,
}

/// `data` of `visibility`.
#[derive(Debug, Deserialize)]
pub struct VisibilityData {
    pub state: String,
}

impl From<StateChangedData> for StateChange {
    fn from(data: StateChangedData) -> Self {
        match data.state.as_str() {
            "initialized" => StateChange::Initialized,
            "error" => StateChange::Error {
                message: data.message.and_then(|value| match value {
                    Value::Null => None,
                    Value::String(text) => Some(text),
                    other => Some(other.to_string()),
                }),
            },
            _ => StateChange::Other(data.state),
        }
    }
}

impl From<VisibilityData> for Visibility {
    fn from(data: VisibilityData) -> Self {
        match data.state.as_str() {
            "visible" => Visibility::Visible,
            "invisible" => Visibility::Invisible,
            _ => Visibility::Other(data.state),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
