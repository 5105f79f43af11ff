// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live carrier tracking for one shipment.
//!
//! The subscription is gated: while disabled it holds no hub connection at
//! all. Enabling opens exactly one subscriber connection, registers the
//! update handlers, and announces interest in the assigned carrier; the
//! announcement is repeated on every reconnect because the hub forgets
//! subscribers across drops. Disabling tears the connection down.
//!
//! The latest accepted location is published on a `watch` channel. Broadcast
//! updates for other carriers are dropped without touching it.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use teslimat_core::traits::shift_api::TrackingApi;
use teslimat_core::{
    CarrierId, CarrierLocation, ConnectionPhase, ConnectionState, QueueSnapshot, ShipmentId,
    TeslimatError,
};
use teslimat_hub::{HubConnection, HubWire};

use crate::estimator::live_tracking_available;

/// Hub invocation announcing interest in one carrier's broadcasts.
pub const SUBSCRIBE_CARRIER: &str = "SubscribeCarrier";

/// Single-carrier location push.
pub const RECEIVE_LOCATION_UPDATE: &str = "ReceiveLocationUpdate";

/// Alias of [`RECEIVE_LOCATION_UPDATE`] kept for hub compatibility; both
/// names feed the same update path.
pub const CARRIER_LOCATION_UPDATE: &str = "CarrierLocationUpdate";

/// Snapshot of every known carrier location, filtered client-side.
pub const RECEIVE_ALL_LOCATIONS: &str = "ReceiveAllLocations";

/// Tracks one carrier on behalf of one shipment.
pub struct DeliverySubscription {
    wire: Arc<dyn HubWire>,
    hub_url: String,
    token: String,
    carrier_id: CarrierId,
    location_tx: watch::Sender<Option<CarrierLocation>>,
    active: Mutex<Option<ActiveLink>>,
}

struct ActiveLink {
    hub: HubConnection,
    resub: JoinHandle<()>,
}

impl DeliverySubscription {
    /// A disabled subscription for `carrier_id`. Holds no connection until
    /// enabled.
    pub fn new(
        wire: Arc<dyn HubWire>,
        hub_url: impl Into<String>,
        token: impl Into<String>,
        carrier_id: CarrierId,
    ) -> Arc<Self> {
        let (location_tx, _) = watch::channel(None);
        Arc::new(Self {
            wire,
            hub_url: hub_url.into(),
            token: token.into(),
            carrier_id,
            location_tx,
            active: Mutex::new(None),
        })
    }

    /// Seeds the display from the REST tracking status and returns the
    /// queue projection.
    ///
    /// The seeded location never overwrites a live sample that has already
    /// arrived.
    pub async fn seed(
        &self,
        tracking: &dyn TrackingApi,
        shipment_id: ShipmentId,
    ) -> Result<QueueSnapshot, TeslimatError> {
        let status = tracking.tracking_status(shipment_id).await?;

        if let Some(mut location) = status.carrier_location {
            if location.carrier_id == self.carrier_id
                && self.location_tx.borrow().is_none()
            {
                location.last_update.get_or_insert_with(Utc::now);
                self.location_tx.send_replace(Some(location));
            }
        }
        Ok(status.queue)
    }

    /// Latest accepted location for the tracked carrier.
    pub fn locations(&self) -> watch::Receiver<Option<CarrierLocation>> {
        self.location_tx.subscribe()
    }

    pub async fn is_enabled(&self) -> bool {
        self.active.lock().await.is_some()
    }

    /// Hub connection state while enabled. Degradation shows up here, never
    /// as an error from the update path.
    pub async fn connection(&self) -> Option<watch::Receiver<ConnectionState>> {
        self.active.lock().await.as_ref().map(|link| link.hub.state())
    }

    /// Derives the gate from the queue depth: the live map is only worth a
    /// connection inside the tracking window.
    pub async fn apply_queue(&self, snapshot: &QueueSnapshot) -> Result<(), TeslimatError> {
        self.set_enabled(live_tracking_available(snapshot.remaining_stops))
            .await
    }

    /// Opens or closes the underlying connection. Idempotent in both
    /// directions; repeated toggles leak no tasks or sockets.
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), TeslimatError> {
        if enabled {
            self.enable().await
        } else {
            self.disable().await;
            Ok(())
        }
    }

    async fn enable(&self) -> Result<(), TeslimatError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Ok(());
        }

        let hub =
            HubConnection::connect(Arc::clone(&self.wire), &self.hub_url, &self.token).await?;
        self.register_handlers(&hub);

        if let Err(e) = subscribe_invoke(&hub, self.carrier_id) {
            debug!(error = %e, "carrier subscribe not delivered");
        }
        let resub = spawn_resubscribe(hub.clone(), self.carrier_id);

        *active = Some(ActiveLink { hub, resub });
        info!(carrier_id = self.carrier_id.0, "delivery subscription opened");
        Ok(())
    }

    async fn disable(&self) {
        let link = self.active.lock().await.take();
        if let Some(link) = link {
            link.resub.abort();
            link.hub.disconnect();
            info!("delivery subscription closed");
        }
    }

    fn register_handlers(&self, hub: &HubConnection) {
        for event in [RECEIVE_LOCATION_UPDATE, CARRIER_LOCATION_UPDATE] {
            let carrier_id = self.carrier_id;
            let tx = self.location_tx.clone();
            hub.on_event(event, move |payload| {
                apply_update(carrier_id, &tx, payload);
            });
        }

        let carrier_id = self.carrier_id;
        let tx = self.location_tx.clone();
        hub.on_event(RECEIVE_ALL_LOCATIONS, move |payload| {
            for location in locations_from(payload) {
                apply_location(carrier_id, &tx, location);
            }
        });
    }
}

fn subscribe_invoke(hub: &HubConnection, carrier_id: CarrierId) -> Result<(), TeslimatError> {
    hub.send(SUBSCRIBE_CARRIER, serde_json::json!([carrier_id.0]))
}

/// Repeats the subscribe announcement on every new Connected state.
fn spawn_resubscribe(hub: HubConnection, carrier_id: CarrierId) -> JoinHandle<()> {
    let mut rx = hub.state();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if rx.borrow_and_update().phase != ConnectionPhase::Connected {
                continue;
            }
            match subscribe_invoke(&hub, carrier_id) {
                Ok(()) => info!(carrier_id = carrier_id.0, "carrier re-subscribed"),
                Err(e) => debug!(error = %e, "carrier re-subscribe failed"),
            }
        }
    })
}

/// One pushed location. The wire delivers the invocation arguments either
/// as the bare payload object or wrapped in a one-element array.
fn apply_update(
    carrier_id: CarrierId,
    tx: &watch::Sender<Option<CarrierLocation>>,
    payload: serde_json::Value,
) {
    let value = match payload {
        serde_json::Value::Array(mut items) if !items.is_empty() => items.remove(0),
        other => other,
    };
    match serde_json::from_value::<CarrierLocation>(value) {
        Ok(location) => apply_location(carrier_id, tx, location),
        Err(e) => warn!(error = %e, "malformed location update dropped"),
    }
}

fn apply_location(
    carrier_id: CarrierId,
    tx: &watch::Sender<Option<CarrierLocation>>,
    mut location: CarrierLocation,
) {
    if location.carrier_id != carrier_id {
        debug!(
            got = location.carrier_id.0,
            tracked = carrier_id.0,
            "update for another carrier dropped"
        );
        return;
    }
    location.last_update.get_or_insert_with(Utc::now);
    tx.send_replace(Some(location));
}

fn locations_from(payload: serde_json::Value) -> Vec<CarrierLocation> {
    if let Ok(list) = serde_json::from_value::<Vec<CarrierLocation>>(payload.clone()) {
        return list;
    }
    if let serde_json::Value::Array(mut items) = payload {
        if items.len() == 1 {
            if let Ok(list) = serde_json::from_value::<Vec<CarrierLocation>>(items.remove(0)) {
                return list;
            }
        }
    }
    warn!("malformed location snapshot dropped");
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_for_the_tracked_carrier_is_published_and_stamped() {
        let (tx, rx) = watch::channel(None);
        apply_update(
            CarrierId(3),
            &tx,
            serde_json::json!({"carrierId": 3, "latitude": 40.97, "longitude": 29.08}),
        );
        let location = rx.borrow().clone().unwrap();
        assert_eq!(location.latitude, 40.97);
        assert!(location.last_update.is_some());
    }

    #[test]
    fn update_for_another_carrier_changes_nothing() {
        let (tx, rx) = watch::channel(None);
        apply_update(
            CarrierId(3),
            &tx,
            serde_json::json!({"carrierId": 9, "latitude": 40.97, "longitude": 29.08}),
        );
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn wrapped_argument_arrays_are_unwrapped() {
        let (tx, rx) = watch::channel(None);
        apply_update(
            CarrierId(3),
            &tx,
            serde_json::json!([{"carrierId": 3, "latitude": 41.0, "longitude": 29.0}]),
        );
        assert!(rx.borrow().is_some());
    }

    #[test]
    fn payload_timestamp_is_preserved() {
        let (tx, rx) = watch::channel(None);
        apply_update(
            CarrierId(3),
            &tx,
            serde_json::json!({
                "carrierId": 3, "latitude": 41.0, "longitude": 29.0,
                "lastUpdate": "2026-08-23T10:15:00Z"
            }),
        );
        let stamp = rx.borrow().clone().unwrap().last_update.unwrap();
        assert_eq!(stamp.to_rfc3339(), "2026-08-23T10:15:00+00:00");
    }

    #[test]
    fn snapshot_lists_parse_bare_and_wrapped() {
        let bare = serde_json::json!([
            {"carrierId": 1, "latitude": 1.0, "longitude": 2.0}
        ]);
        assert_eq!(locations_from(bare).len(), 1);

        let wrapped = serde_json::json!([[
            {"carrierId": 1, "latitude": 1.0, "longitude": 2.0},
            {"carrierId": 2, "latitude": 3.0, "longitude": 4.0}
        ]]);
        assert_eq!(locations_from(wrapped).len(), 2);
    }
}
