// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection manager behavior over a scripted wire: the reconnect
//! schedule, credential refusal, dispatch, and teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use teslimat_core::{ConnectionPhase, TeslimatError};
use teslimat_hub::HubConnection;
use teslimat_test_utils::MockHubWire;

async fn settle() {
    for _ in 0..30 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn reconnect_follows_the_fixed_backoff_schedule() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();
    settle().await;

    for _ in 0..5 {
        wire.script_unreachable();
    }
    wire.drop_connection();

    // Five failed attempts then success: zero delay, then 2s, 5s, 10s, and
    // the final 30s repeating.
    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;

    assert_eq!(hub.phase(), ConnectionPhase::Connected);
    let times = wire.open_times();
    assert_eq!(times.len(), 7);

    let gaps: Vec<u64> = times
        .windows(2)
        .skip(1)
        .map(|w| (w[1] - w[0]).as_millis() as u64)
        .collect();
    assert_eq!(gaps, vec![2000, 5000, 10000, 30000, 30000]);
    // The first reconnect attempt is immediate.
    assert_eq!((times[1] - times[0]).as_millis(), 0);

    hub.disconnect();
}

#[tokio::test(start_paused = true)]
async fn refused_credential_during_reconnect_stops_retrying() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();
    settle().await;

    wire.script_auth_rejected();
    wire.drop_connection();

    tokio::time::sleep(Duration::from_secs(300)).await;
    settle().await;

    assert_eq!(hub.phase(), ConnectionPhase::Disconnected);
    // Initial handshake plus exactly one refused reconnect.
    assert_eq!(wire.open_calls(), 2);
}

#[tokio::test]
async fn refused_credential_at_connect_fails_closed() {
    let wire = MockHubWire::new();
    wire.script_auth_rejected();
    let result = HubConnection::connect(wire.clone(), "ws://hub/location", "token").await;
    assert!(matches!(result, Err(TeslimatError::AuthenticationRejected)));
    assert_eq!(wire.open_calls(), 1);
}

#[tokio::test]
async fn empty_token_never_reaches_the_wire() {
    let wire = MockHubWire::new();
    let result = HubConnection::connect(wire.clone(), "ws://hub/location", "  ").await;
    assert!(matches!(result, Err(TeslimatError::AuthenticationRejected)));
    assert_eq!(wire.open_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn send_outside_connected_phase_is_rejected() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();
    settle().await;

    wire.script_unreachable();
    wire.script_unreachable();
    wire.drop_connection();
    // Let the run loop burn the immediate attempt and park in the 2s delay.
    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;

    assert_eq!(hub.phase(), ConnectionPhase::Reconnecting);
    assert!(matches!(
        hub.send("UpdateLocation", serde_json::json!([1.0, 2.0])),
        Err(TeslimatError::NotConnected)
    ));
    hub.disconnect();
}

#[tokio::test(start_paused = true)]
async fn events_reach_the_registered_handler() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();

    let seen: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    hub.on_event("ReceiveLocationUpdate", move |payload| {
        sink.lock().unwrap().push(payload);
    });

    wire.emit_event(
        "ReceiveLocationUpdate",
        serde_json::json!({"carrierId": 3, "latitude": 40.97, "longitude": 29.08}),
    );
    settle().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["carrierId"], 3);
    drop(seen);
    hub.disconnect();
}

#[tokio::test(start_paused = true)]
async fn re_registering_replaces_the_previous_handler() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();

    let first: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let second: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    {
        let first = Arc::clone(&first);
        hub.on_event("CarrierLocationUpdate", move |_| {
            *first.lock().unwrap() += 1;
        });
    }
    {
        let second = Arc::clone(&second);
        hub.on_event("CarrierLocationUpdate", move |_| {
            *second.lock().unwrap() += 1;
        });
    }

    wire.emit_event("CarrierLocationUpdate", serde_json::json!({}));
    settle().await;

    assert_eq!(*first.lock().unwrap(), 0);
    assert_eq!(*second.lock().unwrap(), 1);
    hub.disconnect();
}

#[tokio::test(start_paused = true)]
async fn disconnect_is_idempotent_and_silences_handlers() {
    let wire = MockHubWire::new();
    let hub = HubConnection::connect(wire.clone(), "ws://hub/location", "token")
        .await
        .unwrap();

    let seen: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    {
        let seen = Arc::clone(&seen);
        hub.on_event("ReceiveLocationUpdate", move |_| {
            *seen.lock().unwrap() += 1;
        });
    }

    hub.disconnect();
    hub.disconnect();
    assert_eq!(hub.phase(), ConnectionPhase::Disconnected);

    wire.emit_event("ReceiveLocationUpdate", serde_json::json!({}));
    settle().await;
    assert_eq!(*seen.lock().unwrap(), 0);

    // No reconnect is attempted after an owner-requested teardown.
    tokio::time::sleep(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(wire.open_calls(), 1);
}
