// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Location sink that records every delivered sample.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use teslimat_core::traits::sink::LocationSink;
use teslimat_core::{LocationSample, TeslimatError};

/// A fan-out target whose deliveries are observable from tests.
pub struct CaptureSink {
    name: String,
    samples: Mutex<Vec<LocationSample>>,
    fail: AtomicBool,
}

impl CaptureSink {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            samples: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    /// Make deliveries fail, modelling a lost channel.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every sample delivered so far, in order.
    pub fn samples(&self) -> Vec<LocationSample> {
        self.samples.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> usize {
        self.samples.lock().unwrap().len()
    }
}

#[async_trait]
impl LocationSink for CaptureSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, sample: &LocationSample) -> Result<(), TeslimatError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TeslimatError::Api {
                message: format!("{} sink refused the sample", self.name),
                source: None,
            });
        }
        self.samples.lock().unwrap().push(sample.clone());
        Ok(())
    }
}
