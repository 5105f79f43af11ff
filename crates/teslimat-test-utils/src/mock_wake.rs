// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock wake source that counts acquires and releases.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use teslimat_core::traits::wake::{WakeLease, WakeSource};
use teslimat_core::TeslimatError;

#[derive(Default)]
struct Counters {
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail_acquire: AtomicBool,
}

/// A wake source whose leases are observable from tests.
pub struct MockWake {
    counters: Arc<Counters>,
}

impl MockWake {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counters: Arc::new(Counters::default()),
        })
    }

    /// Make the next acquires fail (wake lock unavailable).
    pub fn set_fail_acquire(&self, fail: bool) {
        self.counters.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Total successful acquires.
    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    /// Total releases.
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Leases currently held.
    pub fn held(&self) -> usize {
        self.acquired() - self.released()
    }
}

struct MockLease {
    counters: Arc<Counters>,
}

#[async_trait]
impl WakeLease for MockLease {
    async fn release(self: Box<Self>) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WakeSource for MockWake {
    async fn acquire(&self) -> Result<Box<dyn WakeLease>, TeslimatError> {
        if self.counters.fail_acquire.load(Ordering::SeqCst) {
            return Err(TeslimatError::Internal(
                "wake lock unavailable".to_string(),
            ));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockLease {
            counters: Arc::clone(&self.counters),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lease_counts_balance() {
        let wake = MockWake::new();
        let lease = wake.acquire().await.unwrap();
        assert_eq!(wake.held(), 1);
        lease.release().await;
        assert_eq!(wake.held(), 0);
    }

    #[tokio::test]
    async fn failed_acquire_holds_nothing() {
        let wake = MockWake::new();
        wake.set_fail_acquire(true);
        assert!(wake.acquire().await.is_err());
        assert_eq!(wake.held(), 0);
    }
}
