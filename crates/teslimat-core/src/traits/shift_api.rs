// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shift REST surface, consumed by the carrier client.

use async_trait::async_trait;

use crate::error::TeslimatError;
use crate::types::{Position, ShiftRecord, ShipmentId, TrackingStatus};

/// The carrier-side shift endpoints.
///
/// All operations require a bearer credential; implementations fail closed
/// with [`TeslimatError::AuthenticationRejected`] when it is missing or
/// refused.
#[async_trait]
pub trait ShiftApi: Send + Sync {
    /// `POST /shift/start` -- begins a shift, returns the server-issued id.
    async fn start_shift(&self, position: Option<Position>) -> Result<ShiftRecord, TeslimatError>;

    /// `POST /shift/end` -- ends the active shift.
    async fn end_shift(&self, position: Option<Position>) -> Result<(), TeslimatError>;

    /// `GET /shift/current` -- the still-active shift for this carrier, if
    /// any (the recovery path after a client restart).
    async fn current_shift(&self) -> Result<Option<ShiftRecord>, TeslimatError>;

    /// `PUT /shift/location` -- the durable write channel for one sample.
    async fn put_location(&self, position: Position) -> Result<(), TeslimatError>;
}

/// The pharmacy-side tracking status endpoint.
#[async_trait]
pub trait TrackingApi: Send + Sync {
    /// Fetches the queue projection and last known carrier location for a
    /// shipment. Used to seed the display before the first live push.
    async fn tracking_status(
        &self,
        shipment_id: ShipmentId,
    ) -> Result<TrackingStatus, TeslimatError>;
}
