// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory stand-ins for the REST surfaces.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use teslimat_core::traits::shift_api::{ShiftApi, TrackingApi};
use teslimat_core::{
    Position, ShiftId, ShiftRecord, ShipmentId, TeslimatError, TrackingStatus,
};

/// A shift API whose failures and server-side state are test-controlled.
pub struct MockShiftApi {
    fail_start: AtomicBool,
    fail_end: AtomicBool,
    fail_put: AtomicBool,
    current: Mutex<Option<ShiftRecord>>,
    end_calls: AtomicUsize,
    put_locations: Mutex<Vec<Position>>,
}

impl MockShiftApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_start: AtomicBool::new(false),
            fail_end: AtomicBool::new(false),
            fail_put: AtomicBool::new(false),
            current: Mutex::new(None),
            end_calls: AtomicUsize::new(0),
            put_locations: Mutex::new(Vec::new()),
        })
    }

    pub fn set_fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_end(&self, fail: bool) {
        self.fail_end.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Seeds the server-side active shift, for restart recovery tests.
    pub fn set_current_shift(&self, record: Option<ShiftRecord>) {
        *self.current.lock().unwrap() = record;
    }

    /// The shift the server currently considers active.
    pub fn current(&self) -> Option<ShiftRecord> {
        self.current.lock().unwrap().clone()
    }

    pub fn end_calls(&self) -> usize {
        self.end_calls.load(Ordering::SeqCst)
    }

    /// Every position written through the durable channel, in order.
    pub fn put_locations(&self) -> Vec<Position> {
        self.put_locations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShiftApi for MockShiftApi {
    async fn start_shift(&self, position: Option<Position>) -> Result<ShiftRecord, TeslimatError> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(TeslimatError::Api {
                message: "shift start refused".to_string(),
                source: None,
            });
        }
        let record = ShiftRecord {
            shift_id: ShiftId(Uuid::new_v4().to_string()),
            started_at: Utc::now(),
            last_position: position,
        };
        *self.current.lock().unwrap() = Some(record.clone());
        Ok(record)
    }

    async fn end_shift(&self, _position: Option<Position>) -> Result<(), TeslimatError> {
        self.end_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_end.load(Ordering::SeqCst) {
            return Err(TeslimatError::Api {
                message: "shift end refused".to_string(),
                source: None,
            });
        }
        *self.current.lock().unwrap() = None;
        Ok(())
    }

    async fn current_shift(&self) -> Result<Option<ShiftRecord>, TeslimatError> {
        Ok(self.current.lock().unwrap().clone())
    }

    async fn put_location(&self, position: Position) -> Result<(), TeslimatError> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(TeslimatError::Api {
                message: "location write refused".to_string(),
                source: None,
            });
        }
        self.put_locations.lock().unwrap().push(position);
        Ok(())
    }
}

/// A tracking API returning one preconfigured status.
pub struct MockTrackingApi {
    status: Mutex<Option<TrackingStatus>>,
    calls: AtomicUsize,
}

impl MockTrackingApi {
    pub fn new(status: TrackingStatus) -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(Some(status)),
            calls: AtomicUsize::new(0),
        })
    }

    /// A tracking API whose fetches fail, for seed-failure paths.
    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            status: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackingApi for MockTrackingApi {
    async fn tracking_status(
        &self,
        _shipment_id: ShipmentId,
    ) -> Result<TrackingStatus, TeslimatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.status.lock().unwrap().clone() {
            Some(status) => Ok(status),
            None => Err(TeslimatError::Api {
                message: "tracking status unavailable".to_string(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_then_end_clears_current() {
        let api = MockShiftApi::new();
        let record = api.start_shift(None).await.unwrap();
        assert_eq!(api.current().unwrap().shift_id, record.shift_id);
        api.end_shift(None).await.unwrap();
        assert!(api.current().is_none());
    }

    #[tokio::test]
    async fn failed_end_leaves_server_state() {
        let api = MockShiftApi::new();
        api.start_shift(None).await.unwrap();
        api.set_fail_end(true);
        assert!(api.end_shift(None).await.is_err());
        assert!(api.current().is_some());
        assert_eq!(api.end_calls(), 1);
    }

    #[tokio::test]
    async fn put_locations_recorded_in_order() {
        let api = MockShiftApi::new();
        api.put_location(Position {
            latitude: 1.0,
            longitude: 2.0,
        })
        .await
        .unwrap();
        api.put_location(Position {
            latitude: 3.0,
            longitude: 4.0,
        })
        .await
        .unwrap();
        let puts = api.put_locations();
        assert_eq!(puts.len(), 2);
        assert_eq!(puts[1].latitude, 3.0);
    }
}
