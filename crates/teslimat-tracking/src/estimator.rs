// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure projection of a queue snapshot into display tiers.

use teslimat_core::QueueSnapshot;

/// Remaining-stop count at or below which the live map is offered.
/// Deliberately the same boundary as the Approaching tier.
pub const LIVE_TRACKING_THRESHOLD: u32 = 5;

/// Coarse position of a shipment in the carrier's delivery queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTier {
    /// The next delivery is this one.
    NextInLine,
    /// Within the live-tracking window.
    Approaching,
    /// Further back in the queue.
    Queued,
}

/// Tier for a remaining-stop count.
pub fn tier(remaining_stops: u32) -> QueueTier {
    match remaining_stops {
        0 => QueueTier::NextInLine,
        1..=LIVE_TRACKING_THRESHOLD => QueueTier::Approaching,
        _ => QueueTier::Queued,
    }
}

/// Whether the live map should be offered at this queue depth.
pub fn live_tracking_available(remaining_stops: u32) -> bool {
    remaining_stops <= LIVE_TRACKING_THRESHOLD
}

/// Display projection of one queue snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueEstimate {
    pub tier: QueueTier,
    pub live_tracking: bool,
    pub remaining_stops: u32,
    pub estimated_arrival: Option<String>,
}

/// Projects a snapshot for display.
pub fn estimate(snapshot: &QueueSnapshot) -> QueueEstimate {
    QueueEstimate {
        tier: tier(snapshot.remaining_stops),
        live_tracking: live_tracking_available(snapshot.remaining_stops),
        remaining_stops: snapshot.remaining_stops,
        estimated_arrival: snapshot.estimated_arrival.clone(),
    }
}
