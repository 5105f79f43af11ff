// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Teslimat workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a carrier (courier account).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CarrierId(pub i64);

/// Unique identifier for a shift, issued by the server on shift start.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(pub String);

/// Unique identifier for a shipment being tracked by a pharmacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShipmentId(pub i64);

/// A latitude/longitude pair as produced by a position sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// One timestamped position reading, ready to transmit.
///
/// Immutable value produced by the sampler and consumed by the transport.
/// Not persisted anywhere beyond the most recent sample held for fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub carrier_id: CarrierId,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

impl LocationSample {
    /// Builds a sample from a raw position, stamped now.
    pub fn at_now(carrier_id: CarrierId, position: Position) -> Self {
        Self {
            carrier_id,
            latitude: position.latitude,
            longitude: position.longitude,
            captured_at: Utc::now(),
        }
    }
}

/// Phase of a hub connection's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Observable state of one logical hub connection.
///
/// One instance per connection: the carrier sender and a pharmacy
/// subscriber never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    /// Consecutive reconnect attempts since the connection last dropped.
    pub retry_attempt: u32,
}

impl ConnectionState {
    pub fn disconnected() -> Self {
        Self {
            phase: ConnectionPhase::Disconnected,
            retry_attempt: 0,
        }
    }
}

/// A carrier position as broadcast by the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierLocation {
    pub carrier_id: CarrierId,
    pub latitude: f64,
    pub longitude: f64,
    /// Timestamp of the update. Pushes that omit it are stamped on receipt.
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

/// A shift as known to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftRecord {
    pub shift_id: ShiftId,
    pub started_at: DateTime<Utc>,
    /// Last position the server has for this shift, if any.
    pub last_position: Option<Position>,
}

/// Lifecycle status of a shipment, as reported by the tracking status API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    InTransit,
    Delivered,
}

/// Read-only projection of a shipment's place in the delivery queue.
///
/// Display-side metadata only; not part of the tracking protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub remaining_stops: u32,
    #[serde(default)]
    pub estimated_arrival: Option<String>,
    pub shipment_status: ShipmentStatus,
}

/// Tracking status for one shipment as fetched from the REST surface.
///
/// Combines the assigned carrier, its last known location (used to seed the
/// display before the first live push), and the queue projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatus {
    #[serde(default)]
    pub carrier_id: Option<CarrierId>,
    #[serde(default)]
    pub carrier_location: Option<CarrierLocation>,
    #[serde(flatten)]
    pub queue: QueueSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_phase_display() {
        assert_eq!(ConnectionPhase::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionPhase::Reconnecting.to_string(), "reconnecting");
    }

    #[test]
    fn sample_at_now_copies_coordinates() {
        let pos = Position {
            latitude: 40.9650,
            longitude: 29.0800,
        };
        let sample = LocationSample::at_now(CarrierId(7), pos);
        assert_eq!(sample.carrier_id, CarrierId(7));
        assert_eq!(sample.latitude, 40.9650);
        assert_eq!(sample.longitude, 29.0800);
    }

    #[test]
    fn carrier_location_tolerates_missing_last_update() {
        let json = r#"{"carrierId": 3, "latitude": 41.0, "longitude": 29.0}"#;
        let loc: CarrierLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.carrier_id, CarrierId(3));
        assert!(loc.last_update.is_none());
    }

    #[test]
    fn shipment_status_round_trip() {
        let json = serde_json::to_string(&ShipmentStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        let back: ShipmentStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ShipmentStatus::InTransit);
    }

    #[test]
    fn tracking_status_flattens_queue() {
        let json = r#"{
            "carrierId": 5,
            "carrierLocation": {"carrierId": 5, "latitude": 40.9, "longitude": 29.1},
            "remainingStops": 4,
            "shipmentStatus": "in_transit"
        }"#;
        let status: TrackingStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.carrier_id, Some(CarrierId(5)));
        assert_eq!(status.queue.remaining_stops, 4);
        assert_eq!(status.queue.shipment_status, ShipmentStatus::InTransit);
    }
}
