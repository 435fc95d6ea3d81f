//! Load-failure reports raised by the content surface.
//!
//! A web surface can fail to load a resource in several distinct ways: a
//! secure-transport (TLS certificate) error, an HTTP error status, a generic
//! network error, or a load that never completes.  The bridge treats all of
//! them the same way; only the failing URL matters when deciding what to do.
//! The channel is kept so log records say *why* the load failed.

use serde::{Deserialize, Serialize};

/// One failed resource load, tagged by the channel that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum LoadFailure {
    /// TLS handshake or certificate validation failed.
    Ssl { url: String },
    /// The server answered with an error status (4xx/5xx).
    Http { url: String, status: u16 },
    /// DNS, connection or other transport-level failure.
    Network {
        url: String,
        #[serde(default)]
        description: String,
    },
    /// The host gave up waiting for the load to finish.
    Timeout { url: String },
}

impl LoadFailure {
    /// URL of the resource that failed.
    pub fn url(&self) -> &str {
        match self {
            LoadFailure::Ssl { url }
            | LoadFailure::Http { url, .. }
            | LoadFailure::Network { url, .. }
            | LoadFailure::Timeout { url } => url,
        }
    }

    /// Short channel label for log records.
    pub fn channel(&self) -> &'static str {
        match self {
            LoadFailure::Ssl { .. } => "ssl",
            LoadFailure::Http { .. } => "http",
            LoadFailure::Network { .. } => "network",
            LoadFailure::Timeout { .. } => "timeout",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_is_available_for_every_channel() {
        let failures = [
            LoadFailure::Ssl { url: "u".into() },
            LoadFailure::Http { url: "u".into(), status: 503 },
            LoadFailure::Network { url: "u".into(), description: "reset".into() },
            LoadFailure::Timeout { url: "u".into() },
        ];
        for failure in &failures {
            assert_eq!(failure.url(), "u", "channel {}", failure.channel());
        }
    }

    #[test]
    fn test_http_failure_deserializes_from_tagged_json() {
        // Arrange: the shape used by replay scripts
        let json = r#"{"channel":"http","url":"https://example.com/","status":404}"#;

        // Act
        let failure: LoadFailure = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            failure,
            LoadFailure::Http { url: "https://example.com/".into(), status: 404 }
        );
    }

    #[test]
    fn test_network_failure_description_is_optional() {
        let failure: LoadFailure =
            serde_json::from_str(r#"{"channel":"network","url":"x"}"#).unwrap();
        assert_eq!(failure.channel(), "network");
    }
}
