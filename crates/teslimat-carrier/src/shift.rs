// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shift lifecycle state machine.
//!
//! A shift is the carrier's unit of work: starting one begins telemetry,
//! ending one tears it down. The server is the source of truth for which
//! shift is active; this session only mirrors it. Ending is deliberately
//! forgiving: local cleanup always happens even when the server cannot be
//! reached, so a carrier is never stuck transmitting.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use teslimat_core::traits::shift_api::ShiftApi;
use teslimat_core::{ConnectionPhase, Position, ShiftRecord, TeslimatError};
use teslimat_hub::HubConnection;

use crate::sampler::GeoSampler;

/// Hub invocation announcing this connection as an on-shift carrier.
/// Re-issued after every reconnect while the shift is active.
pub const START_SHIFT: &str = "StartShift";

/// Hub invocation announcing the end of the shift.
pub const END_SHIFT: &str = "EndShift";

/// Lifecycle phase of the carrier's shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStatus {
    Idle,
    Starting,
    Active,
    Ending,
}

struct SessionState {
    status: ShiftStatus,
    shift: Option<ShiftRecord>,
}

/// Drives a shift from start to end, owning the sampler underneath it.
pub struct ShiftSession {
    api: Arc<dyn ShiftApi>,
    sampler: Arc<GeoSampler>,
    hub: HubConnection,
    display_name: String,
    state: Mutex<SessionState>,
}

impl ShiftSession {
    pub fn new(
        api: Arc<dyn ShiftApi>,
        sampler: Arc<GeoSampler>,
        hub: HubConnection,
        display_name: impl Into<String>,
    ) -> Arc<Self> {
        let session = Arc::new(Self {
            api,
            sampler,
            hub,
            display_name: display_name.into(),
            state: Mutex::new(SessionState {
                status: ShiftStatus::Idle,
                shift: None,
            }),
        });
        session.spawn_reannounce();
        session
    }

    /// Current lifecycle status.
    pub async fn status(&self) -> ShiftStatus {
        self.state.lock().await.status
    }

    /// The shift this session considers active, if any.
    pub async fn active_shift(&self) -> Option<ShiftRecord> {
        self.state.lock().await.shift.clone()
    }

    /// Starts a shift.
    ///
    /// Fails with [`TeslimatError::AlreadyActive`] when a shift is active or
    /// mid-start. A sampler that cannot establish its watch leaves the shift
    /// active without telemetry rather than failing the start.
    pub async fn start(&self, position: Option<Position>) -> Result<ShiftRecord, TeslimatError> {
        {
            let mut state = self.state.lock().await;
            if matches!(state.status, ShiftStatus::Starting | ShiftStatus::Active) {
                return Err(TeslimatError::AlreadyActive);
            }
            state.status = ShiftStatus::Starting;
        }

        let record = match self.api.start_shift(position).await {
            Ok(record) => record,
            Err(e) => {
                self.state.lock().await.status = ShiftStatus::Idle;
                return Err(e);
            }
        };

        self.begin_telemetry().await;

        let mut state = self.state.lock().await;
        state.status = ShiftStatus::Active;
        state.shift = Some(record.clone());
        info!(shift_id = %record.shift_id.0, "shift started");
        Ok(record)
    }

    /// Ends the shift.
    ///
    /// Idempotent, and never fails: the sampler is stopped and local state
    /// cleared unconditionally; a server that refuses the end is logged and
    /// otherwise ignored. With no shift to end there is nothing to tear
    /// down, so an Idle session returns without touching the server or hub.
    pub async fn end(&self, position: Option<Position>) {
        {
            let mut state = self.state.lock().await;
            if matches!(state.status, ShiftStatus::Idle | ShiftStatus::Ending) {
                return;
            }
            state.status = ShiftStatus::Ending;
        }

        self.sampler.stop().await;

        if let Err(e) = self.hub.send(END_SHIFT, serde_json::json!([])) {
            debug!(error = %e, "shift end not announced on hub");
        }

        if let Err(e) = self.api.end_shift(position).await {
            warn!(error = %e, "shift end not acknowledged by server");
        }

        let mut state = self.state.lock().await;
        state.status = ShiftStatus::Idle;
        state.shift = None;
        info!("shift ended");
    }

    /// Recovers a shift that is still active server-side, the restart path.
    ///
    /// Resuming when this session already has an active shift returns it
    /// unchanged.
    pub async fn resume(&self) -> Result<Option<ShiftRecord>, TeslimatError> {
        {
            let state = self.state.lock().await;
            if state.status == ShiftStatus::Active {
                return Ok(state.shift.clone());
            }
        }

        let Some(record) = self.api.current_shift().await? else {
            return Ok(None);
        };

        self.begin_telemetry().await;

        let mut state = self.state.lock().await;
        state.status = ShiftStatus::Active;
        state.shift = Some(record.clone());
        info!(shift_id = %record.shift_id.0, "shift resumed");
        Ok(Some(record))
    }

    async fn begin_telemetry(&self) {
        if let Err(e) = self.sampler.start().await {
            warn!(error = %e, "sampler unavailable, shift runs without telemetry");
        }
        if let Err(e) = self.announce() {
            debug!(error = %e, "shift start not announced on hub");
        }
    }

    fn announce(&self) -> Result<(), TeslimatError> {
        self.hub
            .send(START_SHIFT, serde_json::json!([self.display_name]))
    }

    /// The hub forgets who is on shift across a reconnect; watch for new
    /// Connected states and announce again while active.
    fn spawn_reannounce(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let mut rx = self.hub.state();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if rx.borrow_and_update().phase != ConnectionPhase::Connected {
                    continue;
                }
                let Some(session) = weak.upgrade() else {
                    return;
                };
                if session.status().await != ShiftStatus::Active {
                    continue;
                }
                match session.announce() {
                    Ok(()) => info!("shift re-announced after reconnect"),
                    Err(e) => debug!(error = %e, "shift re-announce failed"),
                }
            }
        });
    }
}
