//! Channel-backed outbound queue.
//!
//! [`ChannelQueue`] is a [`MessageQueueAdapter`] built on a tokio unbounded
//! MPSC channel.  Producers (a background fetch, a push handler, another
//! thread entirely) hold a [`QueueSender`] and push payloads whenever they
//! like; the bridge pulls them with a non-blocking `try_recv` from the thread
//! that owns the surface.
//!
//! # Why tokio's channel here?
//!
//! Producers may live inside an async runtime, and `UnboundedSender::send` is
//! a plain synchronous call that works both inside and outside one.  No
//! runtime is needed on the pulling side: `try_recv` never awaits.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::application::drainer::MessageQueueAdapter;

/// The pulling end of the queue.
pub struct ChannelQueue {
    // `try_recv` takes `&mut self`; the mutex makes `dequeue(&self)` safe to
    // call from whichever thread holds the adapter.
    receiver: Mutex<UnboundedReceiver<String>>,
}

/// The producing end of the queue.  Clone it freely.
#[derive(Clone)]
pub struct QueueSender {
    sender: UnboundedSender<String>,
}

impl ChannelQueue {
    /// Creates an empty queue and its first sender.
    pub fn new() -> (ChannelQueue, QueueSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            ChannelQueue {
                receiver: Mutex::new(receiver),
            },
            QueueSender { sender },
        )
    }
}

impl MessageQueueAdapter for ChannelQueue {
    fn dequeue(&self) -> Option<String> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }
}

impl QueueSender {
    /// Appends `payload`.  Returns `false` if the queue has been dropped.
    pub fn push(&self, payload: impl Into<String>) -> bool {
        match self.sender.send(payload.into()) {
            Ok(()) => true,
            Err(_) => {
                debug!("outbound queue closed; payload discarded");
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
