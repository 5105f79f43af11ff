// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `teslimat drive` command implementation.
//!
//! Runs the full carrier loop against the configured backend: resume or
//! start a shift, sample the simulated sensor on the configured interval,
//! and fan each fix out to the REST write and the hub broadcast. Ctrl+C
//! ends the shift cleanly.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use teslimat_carrier::{
    CarrierApi, GeoSampler, HubSink, LocationBroadcast, RestSink, ShiftSession,
};
use teslimat_config::TeslimatConfig;
use teslimat_core::{CarrierId, NoopWake, TeslimatError};
use teslimat_hub::{HubConnection, WsWire};

use crate::shift::require_token;
use crate::shutdown;
use crate::sim::SimulatedGeolocator;

/// Runs the `teslimat drive` command.
pub async fn run(config: &TeslimatConfig) -> Result<(), TeslimatError> {
    let token = require_token(config)?;
    let api = Arc::new(CarrierApi::new(&config.api.base_url, token)?);

    let hub = HubConnection::connect(Arc::new(WsWire), &config.hub.url, token).await?;

    let broadcast = Arc::new(LocationBroadcast::new(vec![
        RestSink::new(api.clone()) as Arc<dyn teslimat_core::LocationSink>,
        HubSink::new(hub.clone()),
    ]));
    let sampler = GeoSampler::new(
        Arc::new(SimulatedGeolocator::new()),
        Arc::new(NoopWake),
        broadcast,
        CarrierId(config.carrier.id),
        Duration::from_secs(config.telemetry.sample_interval_secs),
        Duration::from_secs(config.telemetry.poll_timeout_secs),
    );
    let session = ShiftSession::new(
        api,
        sampler,
        hub.clone(),
        config.carrier.display_name.clone(),
    );

    let record = match session.resume().await? {
        Some(record) => {
            info!(shift_id = %record.shift_id.0, "resumed an active shift");
            record
        }
        None => session.start(None).await?,
    };
    println!("on shift {} (Ctrl+C to end)", record.shift_id.0);

    let shutdown_token = shutdown::install_signal_handler();
    shutdown_token.cancelled().await;

    session.end(None).await;
    hub.disconnect();
    println!("shift ended");
    Ok(())
}
