//! Bridge configuration types.
//!
//! [`BridgeConfig`] holds the few settings the bridge needs at runtime.  Every
//! field has a default, so `BridgeConfig::default()` is a working production
//! configuration and a host only sets what it wants to change.
//!
//! # Design rationale
//!
//! Keeping configuration as a plain struct (no global state, no file reads
//! inside the domain) lets each controller be built with exactly the settings
//! it was given.  Reading the values from disk or from host preferences is the
//! caller's job.

use serde::{Deserialize, Serialize};

/// Endpoint that serves in-app message template content.
pub const DEFAULT_OVERLAY_ENDPOINT: &str = "https://cf-native.karte.io/v0/native/overlay";

/// Inert markup shown in place of a top-level document that failed to load.
pub const BLANK_DOCUMENT: &str = "<html><body></body></html>";

/// All runtime configuration for one bridge.
///
/// # Example
///
/// ```rust
/// use inapp_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert!(!cfg.cache_enabled);
/// assert!(cfg.overlay_endpoint.starts_with("https://"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Remote template-content endpoint.  A load failure for exactly this URL
    /// is reported to the host.
    #[serde(default = "default_overlay_endpoint")]
    pub overlay_endpoint: String,

    /// When `true`, a surface that stops being shown is reset and pooled for
    /// the next message instead of being destroyed.
    #[serde(default)]
    pub cache_enabled: bool,

    /// Markup loaded when the current top-level document fails.
    #[serde(default = "default_blank_document")]
    pub blank_document: String,
}

fn default_overlay_endpoint() -> String {
    DEFAULT_OVERLAY_ENDPOINT.to_string()
}
fn default_blank_document() -> String {
    BLANK_DOCUMENT.to_string()
}

impl Default for BridgeConfig {
    /// | Field            | Default                         |
    /// |------------------|---------------------------------|
    /// | overlay_endpoint | [`DEFAULT_OVERLAY_ENDPOINT`]    |
    /// | cache_enabled    | `false`                         |
    /// | blank_document   | [`BLANK_DOCUMENT`]              |
    fn default() -> Self {
        Self {
            overlay_endpoint: default_overlay_endpoint(),
            cache_enabled: false,
            blank_document: default_blank_document(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_is_disabled() {
        // Arrange / Act
        let cfg = BridgeConfig::default();
        // Assert
        assert!(!cfg.cache_enabled);
    }

    #[test]
    fn test_default_overlay_endpoint() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.overlay_endpoint, DEFAULT_OVERLAY_ENDPOINT);
    }

    #[test]
    fn test_default_blank_document_is_empty_markup() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.blank_document, "<html><body></body></html>");
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        // Arrange: only one field present, as a host would write it
        let json = r#"{"cache_enabled": true}"#;

        // Act
        let cfg: BridgeConfig = serde_json::from_str(json).unwrap();

        // Assert
        assert!(cfg.cache_enabled);
        assert_eq!(cfg.overlay_endpoint, DEFAULT_OVERLAY_ENDPOINT);
        assert_eq!(cfg.blank_document, BLANK_DOCUMENT);
    }

    #[test]
    fn test_custom_endpoint_is_kept() {
        let cfg = BridgeConfig {
            overlay_endpoint: "https://staging.example.com/overlay".to_string(),
            ..BridgeConfig::default()
        };
        assert_eq!(cfg.overlay_endpoint, "https://staging.example.com/overlay");
        assert!(!cfg.cache_enabled);
    }
}
