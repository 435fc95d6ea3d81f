//! ErrorClassifier: decides what a failed resource load means.
//!
//! A message template pulls in many sub-resources (images, fonts, scripts).
//! Most failures among them are harmless.  Two URLs are special:
//!
//! 1. **The loaded document itself.**  If the top-level document failed, the
//!    surface may be showing a half-rendered or browser error page.  It is
//!    swapped for an inert blank document.  The host is *not* told.
//! 2. **The overlay endpoint.**  This is where the message content comes from.
//!    If it failed there is nothing to show, so the host is told
//!    (`error_occurred`) and will typically close the message.
//!
//! The two rules are checked separately and may both fire for the same URL.
//! A failure matching neither is ignored.

use crate::domain::failure::LoadFailure;

/// How bad a classified failure is, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSeverity {
    /// Recovered locally by showing the blank document.
    Benign,
    /// Reported to the host.
    Fatal,
}

/// Outcome of classifying one failure.  Both flags may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureClassification {
    /// Rule 1: replace the visible document with the blank fallback.
    pub replace_with_blank: bool,
    /// Rule 2: notify the host via `error_occurred`.
    pub report_to_parent: bool,
}

impl FailureClassification {
    pub fn is_ignored(&self) -> bool {
        !self.replace_with_blank && !self.report_to_parent
    }

    /// `Fatal` whenever the host is notified, `Benign` when only the blank
    /// document is shown, `None` when ignored.
    pub fn severity(&self) -> Option<FailureSeverity> {
        if self.report_to_parent {
            Some(FailureSeverity::Fatal)
        } else if self.replace_with_blank {
            Some(FailureSeverity::Benign)
        } else {
            None
        }
    }
}

/// Classifies a failing URL against the current document and the overlay
/// endpoint.
///
/// `current_loaded_url` is `None` before the first `load`.
///
/// # Example
///
/// ```rust
/// use inapp_bridge::application::error_classifier::classify;
///
/// let c = classify("https://a/", Some("https://a/"), "https://overlay/");
/// assert!(c.replace_with_blank && !c.report_to_parent);
/// ```
pub fn classify(
    failing_url: &str,
    current_loaded_url: Option<&str>,
    overlay_endpoint: &str,
) -> FailureClassification {
    FailureClassification {
        replace_with_blank: current_loaded_url == Some(failing_url),
        report_to_parent: failing_url == overlay_endpoint,
    }
}

/// [`classify`] for a [`LoadFailure`] from any channel.
pub fn classify_failure(
    failure: &LoadFailure,
    current_loaded_url: Option<&str>,
    overlay_endpoint: &str,
) -> FailureClassification {
    classify(failure.url(), current_loaded_url, overlay_endpoint)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
