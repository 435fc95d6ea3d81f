//! # tracker-core
//!
//! Shared tracking types for the in-app messaging SDK.
//!
//! The in-app message bridge forwards `event` messages raised by a message
//! template to "the tracker".  This crate defines what that tracker looks like
//! from the bridge's side of the boundary, plus the small amount of identity
//! and opt-out bookkeeping that sits in front of it.
//!
//! # What lives here? (for beginners)
//!
//! - **`event`** – [`TrackEvent`]: an event name plus a free-form JSON value
//!   bag.  The SDK does not interpret the values; they are delivered verbatim.
//!
//! - **`tracker`** – The [`EventTracker`] trait and two ready-made
//!   implementations: [`RecordingTracker`] keeps events in memory (tests,
//!   tooling) and [`TracingTracker`] writes one log record per event.
//!
//! - **`identity`** – [`VisitorId`] and [`OptOutTracker`]: the visitor
//!   identity value and a wrapper that silently drops events while the user
//!   has opted out of tracking.
//!
//! This crate has no dependencies on the bridge, the content surface, or any
//! platform API.

pub mod event;
pub mod identity;
pub mod tracker;

pub use event::TrackEvent;
pub use identity::{OptOutTracker, VisitorId};
pub use tracker::{EventTracker, RecordingTracker, TracingTracker};
