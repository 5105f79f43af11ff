// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock geolocator for deterministic sampler tests.
//!
//! One-shot responses are scripted in order via [`MockGeolocator::script_fix`]
//! and [`MockGeolocator::script_timeout`]; continuous watch fixes are
//! injected via [`MockGeolocator::emit_watch_fix`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use teslimat_core::traits::geolocator::{Geolocator, PositionStream};
use teslimat_core::{Position, TeslimatError};

enum OneShot {
    Fix(Position),
    Timeout,
    Denied,
}

/// A scripted position sensor.
pub struct MockGeolocator {
    one_shots: Mutex<VecDeque<OneShot>>,
    watch_tx: Mutex<Option<mpsc::UnboundedSender<Position>>>,
    watch_supported: AtomicBool,
    one_shot_calls: AtomicUsize,
}

impl MockGeolocator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            one_shots: Mutex::new(VecDeque::new()),
            watch_tx: Mutex::new(None),
            watch_supported: AtomicBool::new(true),
            one_shot_calls: AtomicUsize::new(0),
        })
    }

    /// Queue a successful one-shot fix.
    pub async fn script_fix(&self, position: Position) {
        self.one_shots.lock().await.push_back(OneShot::Fix(position));
    }

    /// Queue a one-shot timeout.
    pub async fn script_timeout(&self) {
        self.one_shots.lock().await.push_back(OneShot::Timeout);
    }

    /// Queue a permission-denied failure.
    pub async fn script_denied(&self) {
        self.one_shots.lock().await.push_back(OneShot::Denied);
    }

    /// Make `watch_position` fail, modelling an unsupported device.
    pub fn set_watch_supported(&self, supported: bool) {
        self.watch_supported.store(supported, Ordering::SeqCst);
    }

    /// Push a fix into the continuous watch stream.
    ///
    /// No-op if no watch is active.
    pub async fn emit_watch_fix(&self, position: Position) {
        if let Some(tx) = self.watch_tx.lock().await.as_ref() {
            let _ = tx.send(position);
        }
    }

    /// Number of one-shot requests made so far.
    pub fn one_shot_calls(&self) -> usize {
        self.one_shot_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geolocator for MockGeolocator {
    async fn current_position(&self, timeout: Duration) -> Result<Position, TeslimatError> {
        self.one_shot_calls.fetch_add(1, Ordering::SeqCst);
        match self.one_shots.lock().await.pop_front() {
            Some(OneShot::Fix(position)) => Ok(position),
            Some(OneShot::Denied) => Err(TeslimatError::Geolocation(
                "permission denied".to_string(),
            )),
            // Unscripted calls behave like a sensor that never answers.
            Some(OneShot::Timeout) | None => Err(TeslimatError::Timeout { duration: timeout }),
        }
    }

    async fn watch_position(&self) -> Result<PositionStream, TeslimatError> {
        if !self.watch_supported.load(Ordering::SeqCst) {
            return Err(TeslimatError::Geolocation(
                "geolocation not supported".to_string(),
            ));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.watch_tx.lock().await = Some(tx);
        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|position| (position, rx))
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn scripted_fixes_return_in_order() {
        let geo = MockGeolocator::new();
        geo.script_fix(Position {
            latitude: 1.0,
            longitude: 2.0,
        })
        .await;
        geo.script_timeout().await;

        let first = geo.current_position(Duration::from_secs(10)).await.unwrap();
        assert_eq!(first.latitude, 1.0);

        let second = geo.current_position(Duration::from_secs(10)).await;
        assert!(matches!(second, Err(TeslimatError::Timeout { .. })));
        assert_eq!(geo.one_shot_calls(), 2);
    }

    #[tokio::test]
    async fn watch_stream_delivers_emitted_fixes() {
        let geo = MockGeolocator::new();
        let mut stream = geo.watch_position().await.unwrap();
        geo.emit_watch_fix(Position {
            latitude: 40.9,
            longitude: 29.0,
        })
        .await;
        let fix = stream.next().await.unwrap();
        assert_eq!(fix.longitude, 29.0);
    }

    #[tokio::test]
    async fn unsupported_watch_fails() {
        let geo = MockGeolocator::new();
        geo.set_watch_supported(false);
        assert!(matches!(
            geo.watch_position().await,
            Err(TeslimatError::Geolocation(_))
        ));
    }
}
