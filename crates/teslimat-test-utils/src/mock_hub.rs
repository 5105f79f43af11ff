// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted hub wire for connection manager tests.
//!
//! Connect outcomes are queued with [`MockHubWire::script_auth_rejected`]
//! and [`MockHubWire::script_unreachable`]; an empty queue accepts. Every
//! `open` records a [`tokio::time::Instant`] so tests running under a
//! paused clock can assert the exact reconnect schedule.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use teslimat_core::TeslimatError;
use teslimat_hub::{HubDuplex, HubEvent, HubInvoke, HubWire};

enum ConnectOutcome {
    Accept,
    AuthRejected,
    Unreachable,
}

/// A hub wire whose handshakes and streams are driven from the test.
pub struct MockHubWire {
    outcomes: Mutex<VecDeque<ConnectOutcome>>,
    open_times: Mutex<Vec<Instant>>,
    event_tx: Mutex<Option<mpsc::UnboundedSender<HubEvent>>>,
    sent: Arc<Mutex<Vec<HubInvoke>>>,
}

impl MockHubWire {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(VecDeque::new()),
            open_times: Mutex::new(Vec::new()),
            event_tx: Mutex::new(None),
            sent: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Queue a refused-credential handshake.
    pub fn script_auth_rejected(&self) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(ConnectOutcome::AuthRejected);
    }

    /// Queue a failed handshake (hub unreachable).
    pub fn script_unreachable(&self) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(ConnectOutcome::Unreachable);
    }

    /// Queue an accepted handshake explicitly.
    pub fn script_accept(&self) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(ConnectOutcome::Accept);
    }

    /// Instants at which `open` was called, in order.
    pub fn open_times(&self) -> Vec<Instant> {
        self.open_times.lock().unwrap().clone()
    }

    /// Number of handshake attempts so far.
    pub fn open_calls(&self) -> usize {
        self.open_times.lock().unwrap().len()
    }

    /// Delivers one inbound event on the currently open stream.
    ///
    /// No-op when no stream is open.
    pub fn emit_event(&self, name: &str, payload: serde_json::Value) {
        if let Some(tx) = self.event_tx.lock().unwrap().as_ref() {
            let _ = tx.send(HubEvent {
                name: name.to_string(),
                payload,
            });
        }
    }

    /// Severs the currently open stream, as an unexpected network drop.
    pub fn drop_connection(&self) {
        self.event_tx.lock().unwrap().take();
    }

    /// Every invocation sent over any stream this wire opened.
    pub fn sent_invokes(&self) -> Vec<HubInvoke> {
        self.sent.lock().unwrap().clone()
    }

    /// Targets of every sent invocation, in order.
    pub fn sent_targets(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|invoke| invoke.target.clone())
            .collect()
    }
}

#[async_trait]
impl HubWire for MockHubWire {
    async fn open(&self, _url: &str, _token: &str) -> Result<Box<dyn HubDuplex>, TeslimatError> {
        self.open_times.lock().unwrap().push(Instant::now());
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ConnectOutcome::Accept);
        match outcome {
            ConnectOutcome::AuthRejected => Err(TeslimatError::AuthenticationRejected),
            ConnectOutcome::Unreachable => Err(TeslimatError::Hub {
                message: "hub unreachable".to_string(),
                source: None,
            }),
            ConnectOutcome::Accept => {
                let (tx, rx) = mpsc::unbounded_channel();
                *self.event_tx.lock().unwrap() = Some(tx);
                Ok(Box::new(MockDuplex {
                    event_rx: rx,
                    sent: Arc::clone(&self.sent),
                }))
            }
        }
    }
}

struct MockDuplex {
    event_rx: mpsc::UnboundedReceiver<HubEvent>,
    sent: Arc<Mutex<Vec<HubInvoke>>>,
}

#[async_trait]
impl HubDuplex for MockDuplex {
    async fn send(&mut self, invoke: HubInvoke) -> Result<(), TeslimatError> {
        self.sent.lock().unwrap().push(invoke);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<HubEvent> {
        self.event_rx.recv().await
    }

    async fn close(&mut self) {
        self.event_rx.close();
    }
}
