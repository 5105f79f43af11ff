// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic location sampling during an active shift.
//!
//! Two cooperating tasks run while the sampler is started. A watch task
//! consumes the continuous position stream and only caches the most recent
//! fix. A tick task fires on the sample interval, requests one fresh fix
//! with a bounded timeout, and transmits it; when the fresh request fails it
//! falls back to the cached watch fix, and when neither is available the
//! tick is skipped entirely. Nothing is queued and nothing is retried.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use teslimat_core::traits::geolocator::Geolocator;
use teslimat_core::traits::wake::{WakeLease, WakeSource};
use teslimat_core::{CarrierId, LocationSample, Position, TeslimatError};

use crate::transport::LocationBroadcast;

/// Samples device position on a fixed interval and broadcasts each fix.
///
/// `start` and `stop` are both idempotent; stopping releases the wake
/// resource and tears both tasks down.
pub struct GeoSampler {
    geo: Arc<dyn Geolocator>,
    wake: Arc<dyn WakeSource>,
    broadcast: Arc<LocationBroadcast>,
    carrier_id: CarrierId,
    sample_interval: Duration,
    poll_timeout: Duration,
    running: Mutex<Option<Running>>,
}

struct Running {
    cancel: CancellationToken,
    wake: Option<Box<dyn WakeLease>>,
    tasks: Vec<JoinHandle<()>>,
}

impl GeoSampler {
    pub fn new(
        geo: Arc<dyn Geolocator>,
        wake: Arc<dyn WakeSource>,
        broadcast: Arc<LocationBroadcast>,
        carrier_id: CarrierId,
        sample_interval: Duration,
        poll_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            geo,
            wake,
            broadcast,
            carrier_id,
            sample_interval,
            poll_timeout,
            running: Mutex::new(None),
        })
    }

    /// Whether sampling tasks are currently live.
    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Starts sampling. No-op when already started.
    ///
    /// Fails only when the continuous watch cannot be established; a missing
    /// wake facility is logged and sampling proceeds without it.
    pub async fn start(&self) -> Result<(), TeslimatError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Ok(());
        }

        let wake = match self.wake.acquire().await {
            Ok(lease) => Some(lease),
            Err(e) => {
                warn!(error = %e, "wake resource unavailable, sampling without it");
                None
            }
        };

        let mut stream = match self.geo.watch_position().await {
            Ok(stream) => stream,
            Err(e) => {
                if let Some(wake) = wake {
                    wake.release().await;
                }
                return Err(e);
            }
        };
        let cancel = CancellationToken::new();
        let last_fix: Arc<StdMutex<Option<Position>>> = Arc::new(StdMutex::new(None));

        let watch_task = {
            let cancel = cancel.clone();
            let last_fix = Arc::clone(&last_fix);
            tokio::spawn(async move {
                use futures::StreamExt;
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        fix = stream.next() => match fix {
                            Some(position) => {
                                *last_fix.lock().expect("last fix lock poisoned") =
                                    Some(position);
                            }
                            None => {
                                debug!("watch stream ended");
                                return;
                            }
                        }
                    }
                }
            })
        };

        let tick_task = {
            let cancel = cancel.clone();
            let geo = Arc::clone(&self.geo);
            let broadcast = Arc::clone(&self.broadcast);
            let carrier_id = self.carrier_id;
            let poll_timeout = self.poll_timeout;
            let mut interval = tokio::time::interval_at(
                tokio::time::Instant::now() + self.sample_interval,
                self.sample_interval,
            );
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = interval.tick() => {}
                    }

                    let position = match geo.current_position(poll_timeout).await {
                        Ok(position) => Some(position),
                        Err(e) => {
                            let cached = *last_fix.lock().expect("last fix lock poisoned");
                            match cached {
                                Some(position) => {
                                    debug!(error = %e, "fresh fix failed, using cached fix");
                                    Some(position)
                                }
                                None => {
                                    debug!(error = %e, "no fix available, skipping tick");
                                    None
                                }
                            }
                        }
                    };

                    if let Some(position) = position {
                        let sample = LocationSample::at_now(carrier_id, position);
                        broadcast.broadcast(&sample).await;
                    }
                }
            })
        };

        *running = Some(Running {
            cancel,
            wake,
            tasks: vec![watch_task, tick_task],
        });
        info!(interval = ?self.sample_interval, "location sampling started");
        Ok(())
    }

    /// Stops sampling and releases the wake resource. No-op when stopped.
    pub async fn stop(&self) {
        let stopped = self.running.lock().await.take();
        let Some(running) = stopped else {
            return;
        };

        running.cancel.cancel();
        for task in running.tasks {
            let _ = task.await;
        }
        if let Some(wake) = running.wake {
            wake.release().await;
        }
        info!("location sampling stopped");
    }
}
