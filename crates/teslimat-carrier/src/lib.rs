// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Carrier-side client: shift lifecycle, location sampling, and the
//! dual-channel telemetry fan-out.

pub mod api;
pub mod sampler;
pub mod shift;
pub mod transport;

pub use api::CarrierApi;
pub use sampler::GeoSampler;
pub use shift::{ShiftSession, ShiftStatus, END_SHIFT, START_SHIFT};
pub use transport::{HubSink, LocationBroadcast, RestSink, UPDATE_LOCATION};
