//! Domain layer for inapp-bridge.
//!
//! The domain layer contains pure types with no dependencies on the content
//! surface, the host application, or any I/O.
//!
//! # What belongs in the domain layer?
//!
//! - The wire message types (the JSON "language" between template and native)
//! - The surface lifecycle state value
//! - Load-failure reports from the surface
//! - Configuration structures
//!
//! # What does NOT belong here?
//!
//! - Anything that touches the surface or calls back into the host
//! - Script text generation (that is the application-layer codec)

pub mod config;
pub mod failure;
pub mod messages;
pub mod state;

pub use config::BridgeConfig;
pub use failure::LoadFailure;
pub use messages::{BridgeMessage, InboundMessage, StateChange, TouchableRegion, Visibility};
pub use state::SurfaceState;
