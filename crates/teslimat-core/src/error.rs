// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Teslimat tracking client.

use thiserror::Error;

/// The primary error type used across the Teslimat workspace.
///
/// Transient telemetry failures (a single REST write or hub invoke) are
/// logged and swallowed at the call site rather than propagated; the
/// variants here cover the outcomes that callers are expected to branch on.
#[derive(Debug, Error)]
pub enum TeslimatError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// REST surface errors (request construction, transport, non-2xx status).
    #[error("api error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Hub transport errors (socket failure, malformed frame).
    #[error("hub error: {message}")]
    Hub {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A shift start was attempted while another shift is already active.
    #[error("a shift is already active")]
    AlreadyActive,

    /// A hub invoke was attempted while the connection is not in the
    /// Connected phase. Callers treat this as "this tick did not get
    /// through", never as fatal.
    #[error("hub connection is not connected")]
    NotConnected,

    /// The hub or API refused the bearer credential. Fail closed: no
    /// anonymous fallback, no automatic retry with the same credential.
    #[error("authentication rejected")]
    AuthenticationRejected,

    /// Geolocation capability failure (permission denied or unsupported).
    #[error("geolocation unavailable: {0}")]
    Geolocation(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let e = TeslimatError::AlreadyActive;
        assert_eq!(e.to_string(), "a shift is already active");

        let e = TeslimatError::NotConnected;
        assert_eq!(e.to_string(), "hub connection is not connected");

        let e = TeslimatError::AuthenticationRejected;
        assert_eq!(e.to_string(), "authentication rejected");

        let e = TeslimatError::Api {
            message: "status 500".into(),
            source: None,
        };
        assert!(e.to_string().contains("status 500"));

        let e = TeslimatError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        assert!(e.to_string().contains("10s"));
    }
}
