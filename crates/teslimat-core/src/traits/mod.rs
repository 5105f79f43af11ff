// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits injected into the tracking components.

pub mod geolocator;
pub mod shift_api;
pub mod sink;
pub mod wake;

pub use geolocator::{Geolocator, PositionStream};
pub use shift_api::{ShiftApi, TrackingApi};
pub use sink::LocationSink;
pub use wake::{NoopWake, WakeLease, WakeSource};
