// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated position sensor replaying a fixed demo route.
//!
//! The route is a short out-and-back loop between Kadıköy and Bostancı
//! (İstanbul), cycled forever. Watch fixes get a little jitter so the
//! stream does not look frozen between waypoints.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use teslimat_core::traits::geolocator::{Geolocator, PositionStream};
use teslimat_core::{Position, TeslimatError};

/// Out-and-back demo route.
const ROUTE: [(f64, f64); 12] = [
    (40.9650, 29.0800),
    (40.9655, 29.0810),
    (40.9660, 29.0820),
    (40.9665, 29.0830),
    (40.9670, 29.0840),
    (40.9675, 29.0850),
    (40.9680, 29.0860),
    (40.9675, 29.0850),
    (40.9670, 29.0840),
    (40.9665, 29.0830),
    (40.9660, 29.0820),
    (40.9655, 29.0810),
];

const WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// A position sensor that drives the demo route.
pub struct SimulatedGeolocator {
    waypoint: AtomicUsize,
}

impl SimulatedGeolocator {
    pub fn new() -> Self {
        Self {
            waypoint: AtomicUsize::new(0),
        }
    }

    fn advance(&self) -> Position {
        let index = self.waypoint.fetch_add(1, Ordering::SeqCst) % ROUTE.len();
        let (latitude, longitude) = ROUTE[index];
        Position {
            latitude,
            longitude,
        }
    }
}

impl Default for SimulatedGeolocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geolocator for SimulatedGeolocator {
    async fn current_position(&self, _timeout: Duration) -> Result<Position, TeslimatError> {
        Ok(self.advance())
    }

    async fn watch_position(&self) -> Result<PositionStream, TeslimatError> {
        let mut index = self.waypoint.load(Ordering::SeqCst);
        let stream = futures::stream::unfold(
            tokio::time::interval(WATCH_INTERVAL),
            move |mut ticker| {
                index += 1;
                async move {
                    ticker.tick().await;
                    let (latitude, longitude) = ROUTE[index % ROUTE.len()];
                    let jitter = rand::thread_rng().gen_range(-0.0001..0.0001);
                    let position = Position {
                        latitude: latitude + jitter,
                        longitude: longitude + jitter,
                    };
                    Some((position, ticker))
                }
            },
        );
        Ok(Box::pin(stream))
    }
}
