// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `teslimat track` command implementation.
//!
//! Follows one shipment: fetches the tracking status, opens the live
//! subscription when the shipment is inside the tracking window, and prints
//! every accepted location update until Ctrl+C.

use std::sync::Arc;

use tracing::info;

use teslimat_config::TeslimatConfig;
use teslimat_core::traits::shift_api::TrackingApi;
use teslimat_core::{CarrierId, ShipmentId, TeslimatError};
use teslimat_hub::WsWire;
use teslimat_tracking::{estimate, DeliverySubscription, TrackingClient};

use crate::shift::require_token;
use crate::shutdown;

/// Runs the `teslimat track` command.
pub async fn run(
    config: &TeslimatConfig,
    shipment: i64,
    carrier: Option<i64>,
) -> Result<(), TeslimatError> {
    let token = require_token(config)?;
    let tracking = TrackingClient::new(&config.api.base_url, token)?;
    let shipment_id = ShipmentId(shipment);

    let carrier_id = match carrier {
        Some(id) => CarrierId(id),
        None => tracking
            .tracking_status(shipment_id)
            .await?
            .carrier_id
            .ok_or_else(|| {
                TeslimatError::Config("shipment has no assigned carrier".to_string())
            })?,
    };

    let subscription =
        DeliverySubscription::new(Arc::new(WsWire), &config.hub.url, token, carrier_id);

    let queue = subscription.seed(&tracking, shipment_id).await?;
    let projection = estimate(&queue);
    println!(
        "shipment {}: {} stops remaining ({:?})",
        shipment, queue.remaining_stops, projection.tier
    );

    subscription.apply_queue(&queue).await?;
    if !projection.live_tracking {
        println!("carrier is still outside the live tracking window");
        return Ok(());
    }

    if let Some(seed) = subscription.locations().borrow().clone() {
        println!("last known position {:.4}, {:.4}", seed.latitude, seed.longitude);
    }
    info!(carrier_id = carrier_id.0, "following carrier (Ctrl+C to stop)");

    let mut locations = subscription.locations();
    let shutdown_token = shutdown::install_signal_handler();
    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => break,
            changed = locations.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(location) = locations.borrow_and_update().clone() {
                    let stamp = location
                        .last_update
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_default();
                    println!(
                        "carrier at {:.4}, {:.4} ({stamp})",
                        location.latitude, location.longitude
                    );
                }
            }
        }
    }

    subscription.set_enabled(false).await?;
    println!("tracking stopped");
    Ok(())
}
