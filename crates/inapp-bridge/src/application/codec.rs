//! Protocol codec for the template bridge.
//!
//! This module provides pure functions for both directions of the bridge:
//!
//! ```text
//! Template → Native:  raw JSON string → BridgeMessage → InboundMessage
//!                     call: decode() then parse(), or decode_inbound()
//!
//! Native → Template:  payload string  → executable script text
//!                     call: encode() / handoff_script() / reset_script()
//! ```
//!
//! No function here touches the surface or has side effects, which keeps the
//! codec testable without any host.
//!
//! # Outbound script format
//!
//! Every outbound call targets a method on the template's well-known global
//! object and takes at most one argument: the payload as a JS string literal.
//!
//! ```text
//! window.tracker.handleResponseData("{\"messages\":[...]}")
//! window.tracker.resetPageState()
//! ```
//!
//! The payload is spliced into script source, so it must be a correctly
//! escaped literal.  A JSON string literal is also a valid JS string literal
//! once U+2028 and U+2029 are escaped (JSON allows them raw; older JS engines
//! treat them as line terminators).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::messages::{
    names, BridgeMessage, DocumentChangedData, EventData, InboundMessage, OpenUrlData,
    StateChangedData, VisibilityData,
};

/// Global object exposed by the template script.
pub const SCRIPT_OBJECT: &str = "window.tracker";

/// Template method that receives one queued payload.
pub const HANDLE_RESPONSE_DATA: &str = "handleResponseData";

/// Template method that returns the page to its pre-message state.
pub const RESET_PAGE_STATE: &str = "resetPageState";

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors raised inside the bridge.
///
/// None of these ever cross into the host: the controller logs them and
/// carries on.  They exist so the internal paths can use `?` and so tests can
/// see which path was taken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The inbound text was not a valid envelope, or a known message's
    /// `data` did not match its schema.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// An operation was attempted after the surface reached `Destroyed`.
    #[error("surface destroyed")]
    SurfaceDestroyed,
}

// ── Template → Native ─────────────────────────────────────────────────────────

/// Decodes one raw inbound string into a named envelope.
///
/// # Errors
///
/// Returns [`BridgeError::MalformedMessage`] if `raw` is not JSON, is not an
/// object, has no `name`, or has a non-object `data`.  An unknown `name` is
/// *not* an error here.
///
/// # Example
///
/// ```rust
/// use inapp_bridge::application::codec::decode;
///
/// let msg = decode(r#"{"name":"visibility","data":{"state":"visible"}}"#).unwrap();
/// assert_eq!(msg.name, "visibility");
/// assert!(decode("not json").is_err());
/// ```
pub fn decode(raw: &str) -> Result<BridgeMessage, BridgeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| BridgeError::MalformedMessage(e.to_string()))?;
    // Derived struct deserializers also accept arrays; the wire format does not.
    if !value.is_object() {
        return Err(BridgeError::MalformedMessage(
            "message is not a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| BridgeError::MalformedMessage(e.to_string()))
}

/// Converts an envelope into its typed form.
///
/// Unknown names become [`InboundMessage::Unknown`].
///
/// # Errors
///
/// Returns [`BridgeError::MalformedMessage`] when a known message's `data`
/// does not fit that message's schema (for example `open_url` without `url`).
pub fn parse(message: BridgeMessage) -> Result<InboundMessage, BridgeError> {
    let BridgeMessage { name, data } = message;
    let typed = match name.as_str() {
        names::STATE_CHANGED => {
            InboundMessage::StateChanged(data_as::<StateChangedData>(&name, data)?.into())
        }
        names::EVENT => {
            let EventData { event_name, values } = data_as(&name, data)?;
            InboundMessage::Event { event_name, values }
        }
        names::OPEN_URL => {
            let OpenUrlData { url } = data_as(&name, data)?;
            InboundMessage::OpenUrl { url }
        }
        names::DOCUMENT_CHANGED => {
            let DocumentChangedData { touchable_regions } = data_as(&name, data)?;
            InboundMessage::DocumentChanged { touchable_regions }
        }
        names::VISIBILITY => {
            InboundMessage::Visibility(data_as::<VisibilityData>(&name, data)?.into())
        }
        _ => InboundMessage::Unknown { name },
    };
    Ok(typed)
}

/// [`decode`] followed by [`parse`].
pub fn decode_inbound(raw: &str) -> Result<InboundMessage, BridgeError> {
    parse(decode(raw)?)
}

fn data_as<T: DeserializeOwned>(name: &str, data: Map<String, Value>) -> Result<T, BridgeError> {
    serde_json::from_value(Value::Object(data))
        .map_err(|e| BridgeError::MalformedMessage(format!("{name}: {e}")))
}

// ── Native → Template ─────────────────────────────────────────────────────────

/// Formats a one-argument call on the template's global object.
///
/// # Example
///
/// ```rust
/// use inapp_bridge::application::codec::encode;
///
/// let script = encode("handleResponseData", r#"{"a":"it's"}"#);
/// assert_eq!(script, r#"window.tracker.handleResponseData("{\"a\":\"it's\"}")"#);
/// ```
pub fn encode(function: &str, payload: &str) -> String {
    format!("{SCRIPT_OBJECT}.{function}({})", js_string_literal(payload))
}

/// Formats a zero-argument call on the template's global object.
pub fn encode_no_args(function: &str) -> String {
    format!("{SCRIPT_OBJECT}.{function}()")
}

/// Script that hands one queued payload to the template.
pub fn handoff_script(payload: &str) -> String {
    encode(HANDLE_RESPONSE_DATA, payload)
}

/// Script that resets the template before the surface is pooled.
pub fn reset_script() -> String {
    encode_no_args(RESET_PAGE_STATE)
}

/// Quotes `payload` as a double-quoted string literal safe for script source.
fn js_string_literal(payload: &str) -> String {
    // `Value`'s Display is infallible and applies JSON string escaping.
    Value::String(payload.to_owned())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
