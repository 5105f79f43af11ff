// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out of location samples to the REST write and the hub invoke.
//!
//! Both channels carry every sample concurrently. Neither is retried and
//! neither failure affects the other: the REST write is the durable record,
//! the hub invoke is the low-latency broadcast, and a lost sample on either
//! is superseded by the next tick.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use teslimat_core::traits::shift_api::ShiftApi;
use teslimat_core::traits::sink::LocationSink;
use teslimat_core::{LocationSample, Position, TeslimatError};
use teslimat_hub::HubConnection;

/// Hub invocation target carrying one location sample.
pub const UPDATE_LOCATION: &str = "UpdateLocation";

/// Broadcasts one sample to every registered sink concurrently.
pub struct LocationBroadcast {
    sinks: Vec<Arc<dyn LocationSink>>,
}

impl LocationBroadcast {
    pub fn new(sinks: Vec<Arc<dyn LocationSink>>) -> Self {
        Self { sinks }
    }

    /// Delivers the sample to all sinks. Failures are logged per sink and
    /// never propagate; the broadcast itself cannot fail.
    pub async fn broadcast(&self, sample: &LocationSample) {
        let sends = self.sinks.iter().map(|sink| async move {
            match sink.send(sample).await {
                Ok(()) => debug!(sink = sink.name(), "sample delivered"),
                Err(e) => warn!(sink = sink.name(), error = %e, "sample delivery failed"),
            }
        });
        futures::future::join_all(sends).await;
    }
}

/// The durable channel: `PUT /shift/location`.
pub struct RestSink {
    api: Arc<dyn ShiftApi>,
}

impl RestSink {
    pub fn new(api: Arc<dyn ShiftApi>) -> Arc<Self> {
        Arc::new(Self { api })
    }
}

#[async_trait]
impl LocationSink for RestSink {
    fn name(&self) -> &str {
        "rest"
    }

    async fn send(&self, sample: &LocationSample) -> Result<(), TeslimatError> {
        self.api
            .put_location(Position {
                latitude: sample.latitude,
                longitude: sample.longitude,
            })
            .await
    }
}

/// The broadcast channel: an `UpdateLocation` invoke on the hub.
pub struct HubSink {
    hub: HubConnection,
}

impl HubSink {
    pub fn new(hub: HubConnection) -> Arc<Self> {
        Arc::new(Self { hub })
    }
}

#[async_trait]
impl LocationSink for HubSink {
    fn name(&self) -> &str {
        "hub"
    }

    async fn send(&self, sample: &LocationSample) -> Result<(), TeslimatError> {
        self.hub.send(
            UPDATE_LOCATION,
            serde_json::json!([sample.latitude, sample.longitude]),
        )
    }
}
