// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wake-resource capability trait.
//!
//! Browser targets hold a screen wake lock while telemetry runs; other
//! targets get [`NoopWake`]. The lease is exclusively owned by one sampler
//! at a time (enforced upstream by the single-active-shift invariant).

use async_trait::async_trait;

use crate::error::TeslimatError;

/// A held wake resource. Released explicitly on sampler stop.
#[async_trait]
pub trait WakeLease: Send {
    /// Releases the resource. Consumes the lease.
    async fn release(self: Box<Self>);
}

/// Capability for acquiring a wake resource.
#[async_trait]
pub trait WakeSource: Send + Sync {
    /// Acquires the wake resource for the duration of active telemetry.
    async fn acquire(&self) -> Result<Box<dyn WakeLease>, TeslimatError>;
}

/// Wake source for targets without a wake-lock facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWake;

struct NoopLease;

#[async_trait]
impl WakeLease for NoopLease {
    async fn release(self: Box<Self>) {}
}

#[async_trait]
impl WakeSource for NoopWake {
    async fn acquire(&self) -> Result<Box<dyn WakeLease>, TeslimatError> {
        Ok(Box::new(NoopLease))
    }
}
