//! Host capabilities consumed by the bridge.
//!
//! The bridge never creates a web view or a message window itself.  The host
//! application hands it two capabilities:
//!
//! - a [`ContentSurface`]: the embedded web renderer the template runs in;
//! - a [`ParentCallback`]: the message container that shows, hides and
//!   positions that renderer and reacts to template requests.
//!
//! Platform integrations implement these traits on top of the real web view.
//! [`crate::infrastructure::recording`] provides in-memory implementations.

use thiserror::Error;

use crate::domain::messages::TouchableRegion;

/// Why a script could not be handed to the surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The underlying renderer was already released.
    #[error("surface released")]
    Released,

    /// The renderer refused the script (for example, it is mid-navigation).
    #[error("script evaluation rejected: {0}")]
    Rejected(String),
}

/// The embedded web renderer that hosts one message template.
///
/// All methods are called from the thread that owns the surface.  Script
/// evaluation is fire-and-forget: `Ok(())` means the script was handed over,
/// not that it ran.
pub trait ContentSurface {
    /// Starts loading `url` as the top-level document.
    fn load_url(&mut self, url: &str);

    /// Replaces the top-level document with inline markup.
    fn load_markup(&mut self, markup: &str);

    /// Queues `script` for execution in the current document.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the surface cannot accept scripts.
    fn evaluate_script(&mut self, script: &str) -> Result<(), SurfaceError>;

    /// Whether the surface's own history has an entry to go back to.
    fn can_go_back(&self) -> bool;

    /// Navigates one entry back in the surface's history.
    fn go_back(&mut self);

    /// Releases the renderer and everything it holds.
    fn destroy(&mut self);
}

/// The host-side container of the message.
#[cfg_attr(test, mockall::automock)]
pub trait ParentCallback {
    /// Open `url` outside the surface (browser, deep link handler, ...).
    fn open_url(&self, url: &str);

    /// The areas of the surface that should receive touches changed.
    fn update_touchable_regions(&self, regions: &[TouchableRegion]);

    /// Make the message visible.
    fn show(&self);

    /// Hide the message.
    fn dismiss(&self);

    /// The template content could not be fetched; the host should give up on
    /// this message.
    fn error_occurred(&self);
}
