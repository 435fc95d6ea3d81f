//! inapp-bridge library crate.
//!
//! This crate renders remotely-fetched in-app message templates inside an
//! embedded web content surface owned by the host application, and carries
//! JSON messages both ways between native code and the template script.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Template script (JSON strings via the surface's script bridge)
//!         ↕
//! [inapp-bridge]
//!   ├── domain/           Pure types: wire messages, SurfaceState, LoadFailure, BridgeConfig
//!   ├── application/      Codec, state machine, drainer, failure classifier, controller
//!   └── infrastructure/
//!         ├── channel_queue/  Thread-safe outbound queue (tokio mpsc)
//!         ├── recording/      In-memory surface and parent implementations
//!         └── replay/         JSON-lines script runner used by `inapp-replay`
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no knowledge of the surface or the host.
//! - `application` depends on `domain` and `tracker-core` only; every host
//!   capability (surface, parent, queue, tracker) arrives as a trait object or
//!   generic parameter.
//! - `infrastructure` provides concrete implementations of those capabilities.
//!
//! # Threading
//!
//! The controller runs on the single thread that owns the content surface
//! (the UI thread on a device).  It takes `&mut self` everywhere and holds no
//! locks.  The outbound queue is the only piece shared across threads.

/// Domain layer: pure business-logic types (no I/O).
pub mod domain;

/// Application layer: protocol codec, lifecycle state machine and orchestration.
pub mod application;

/// Infrastructure layer: queue adapter, in-memory host doubles and the replay runner.
pub mod infrastructure;

pub use application::{
    BridgeError, ContentSurface, ContentSurfaceController, MessageQueueAdapter, ParentCallback,
    SurfaceCache, SurfaceError,
};
pub use domain::{BridgeConfig, LoadFailure, SurfaceState};
