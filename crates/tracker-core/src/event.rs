//! Tracked event value type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single tracked event: a name plus a JSON object of values.
///
/// The value bag is carried exactly as the producer supplied it.  Nothing in
/// the SDK core validates or rewrites event names or values; that belongs to
/// the analytics backend.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use tracker_core::TrackEvent;
///
/// let event = TrackEvent::from_value("message_click", json!({"campaign_id": "c-1"}));
/// assert_eq!(event.name, "message_click");
/// assert_eq!(event.values["campaign_id"], "c-1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    /// Event name as emitted by the producer.
    pub name: String,
    /// Free-form event values.
    #[serde(default)]
    pub values: Map<String, Value>,
}

impl TrackEvent {
    /// Creates an event from a name and an already-built value map.
    pub fn new(name: impl Into<String>, values: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Creates an event from any JSON value.
    ///
    /// Object values become the value bag.  Any other value (including
    /// `null`) produces an empty bag, since a tracked event's values are
    /// always keyed.
    pub fn from_value(name: impl Into<String>, values: Value) -> Self {
        let values = match values {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(name, values)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
