// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Teslimat tracking client.
//!
//! This crate provides the foundational trait definitions, error type, and
//! common types used throughout the Teslimat workspace. Device capabilities
//! (position sensors, wake resource) and the consumed REST surface are
//! expressed as traits so every state machine stays unit-testable.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TeslimatError;
pub use traits::{
    Geolocator, LocationSink, NoopWake, PositionStream, ShiftApi, TrackingApi, WakeLease,
    WakeSource,
};
pub use types::{
    CarrierId, CarrierLocation, ConnectionPhase, ConnectionState, LocationSample, Position,
    QueueSnapshot, ShiftId, ShiftRecord, ShipmentId, ShipmentStatus, TrackingStatus,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_state_starts_disconnected() {
        let state = ConnectionState::disconnected();
        assert_eq!(state.phase, ConnectionPhase::Disconnected);
        assert_eq!(state.retry_attempt, 0);
    }

    #[test]
    fn error_and_types_are_exported() {
        let _e = TeslimatError::NotConnected;
        let _p = Position {
            latitude: 0.0,
            longitude: 0.0,
        };
    }
}
