// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Geolocation capability trait.
//!
//! The device position APIs (continuous watch, one-shot request) are
//! injected behind this trait so the sampler state machine stays fully
//! unit-testable without a real sensor.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;

use crate::error::TeslimatError;
use crate::types::Position;

/// Continuous stream of position fixes from a watch subscription.
///
/// Dropping the stream cancels the underlying watch.
pub type PositionStream = Pin<Box<dyn Stream<Item = Position> + Send>>;

/// Capability for reading device position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Requests a single fresh position.
    ///
    /// Implementations must give up within `timeout` and return
    /// [`TeslimatError::Timeout`] rather than blocking the tick.
    async fn current_position(&self, timeout: Duration) -> Result<Position, TeslimatError>;

    /// Subscribes to best-effort continuous position updates.
    ///
    /// Fails with [`TeslimatError::Geolocation`] when the capability is
    /// denied or unsupported on this device.
    async fn watch_position(&self) -> Result<PositionStream, TeslimatError>;
}
