// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pharmacy-side client: queue estimation and live carrier tracking.

pub mod api;
pub mod estimator;
pub mod subscription;

pub use api::TrackingClient;
pub use estimator::{
    estimate, live_tracking_available, tier, QueueEstimate, QueueTier, LIVE_TRACKING_THRESHOLD,
};
pub use subscription::{
    DeliverySubscription, CARRIER_LOCATION_UPDATE, RECEIVE_ALL_LOCATIONS,
    RECEIVE_LOCATION_UPDATE, SUBSCRIBE_CARRIER,
};
