// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out target for outbound location samples.

use async_trait::async_trait;

use crate::error::TeslimatError;
use crate::types::LocationSample;

/// One independent destination for a telemetry sample.
///
/// The REST write and the hub invoke are separate sinks of the same
/// broadcast; a failure in one must never prevent or delay the other.
#[async_trait]
pub trait LocationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Delivers one sample. No queuing or retry: a lost sample is an
    /// expected failure mode, superseded by the next tick.
    async fn send(&self, sample: &LocationSample) -> Result<(), TeslimatError>;
}
