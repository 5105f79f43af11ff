// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire abstraction for the hub transport.
//!
//! [`HubWire`] opens one authenticated duplex stream; the connection
//! manager owns reconnection and state, the wire owns only the socket.
//! Tests inject a scripted wire instead of a real websocket.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use teslimat_core::TeslimatError;

/// One outbound hub invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubInvoke {
    /// Invocation target, e.g. `UpdateLocation`.
    pub target: String,
    /// Positional arguments as a JSON array.
    pub arguments: serde_json::Value,
}

impl HubInvoke {
    pub fn new(target: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            target: target.into(),
            arguments,
        }
    }
}

/// One inbound broadcast event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubEvent {
    /// Event name, e.g. `ReceiveLocationUpdate`.
    #[serde(rename = "target")]
    pub name: String,
    /// Event payload.
    #[serde(rename = "arguments")]
    pub payload: serde_json::Value,
}

/// Factory for authenticated duplex streams to the hub.
#[async_trait]
pub trait HubWire: Send + Sync {
    /// Opens one duplex stream, performing the authenticated handshake.
    ///
    /// A refused credential maps to
    /// [`TeslimatError::AuthenticationRejected`]; there is no anonymous
    /// fallback.
    async fn open(&self, url: &str, token: &str) -> Result<Box<dyn HubDuplex>, TeslimatError>;
}

/// An open bidirectional stream to the hub.
#[async_trait]
pub trait HubDuplex: Send {
    /// Sends one invocation.
    async fn send(&mut self, invoke: HubInvoke) -> Result<(), TeslimatError>;

    /// Waits for the next inbound event. `None` means the stream closed.
    async fn next_event(&mut self) -> Option<HubEvent>;

    /// Closes the stream. Best effort.
    async fn close(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoke_serializes_with_target_and_arguments() {
        let invoke = HubInvoke::new("UpdateLocation", serde_json::json!([40.9, 29.0]));
        let json = serde_json::to_value(&invoke).unwrap();
        assert_eq!(json["target"], "UpdateLocation");
        assert_eq!(json["arguments"][0], 40.9);
    }

    #[test]
    fn event_deserializes_from_wire_frame() {
        let frame = r#"{"target": "ReceiveLocationUpdate", "arguments": {"carrierId": 1}}"#;
        let event: HubEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(event.name, "ReceiveLocationUpdate");
        assert_eq!(event.payload["carrierId"], 1);
    }
}
