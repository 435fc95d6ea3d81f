//! Infrastructure layer for inapp-bridge.
//!
//! Concrete implementations of the capabilities the application layer
//! consumes, plus the replay runner built from them.
//!
//! # Responsibilities
//!
//! - A thread-safe outbound queue ([`channel_queue`])
//! - In-memory surface and parent implementations ([`recording`])
//! - Parsing and running replay scripts ([`replay`])
//!
//! # What does NOT belong here?
//!
//! - Message decoding or lifecycle rules (that is the application layer)
//! - Wire type definitions (that is the domain layer)

pub mod channel_queue;
pub mod recording;
pub mod replay;

pub use channel_queue::{ChannelQueue, QueueSender};
pub use recording::{ParentCall, RecordingParent, RecordingSurface};
pub use replay::{parse_script, ReplayConfig, ReplaySession, ReplayStep, ReplaySummary};
