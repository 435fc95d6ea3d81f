//! Application layer for inapp-bridge.
//!
//! The application layer holds the bridge logic.  It knows *what* to do with
//! every inbound message and surface event, but reaches the outside world only
//! through the capability traits in [`host`] and [`drainer`].
//!
//! # Responsibilities
//!
//! - **`codec`** – inbound JSON ↔ typed messages; outbound script text
//! - **`state_machine`** – `Loading` / `Ready` / `Destroyed` transitions
//! - **`drainer`** – readiness-gated delivery of queued payloads
//! - **`error_classifier`** – benign vs. fatal load failures
//! - **`controller`** – orchestration of all of the above for one surface
//! - **`surface_cache`** – keeps one reset surface warm for reuse
//!
//! # What does NOT belong here?
//!
//! - Concrete surfaces, queues or host callbacks (that is infrastructure)
//! - Reading configuration from files or the environment

pub mod codec;
pub mod controller;
pub mod drainer;
pub mod error_classifier;
pub mod host;
pub mod state_machine;
pub mod surface_cache;

pub use codec::BridgeError;
pub use controller::{Collaborators, ContentSurfaceController, SurfaceId};
pub use drainer::{DrainReport, MessageQueueAdapter, OutboundQueueDrainer};
pub use error_classifier::{FailureClassification, FailureSeverity};
pub use host::{ContentSurface, ParentCallback, SurfaceError};
pub use state_machine::{BridgeStateMachine, Transition};
pub use surface_cache::SurfaceCache;
