// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock capability adapters shared by the workspace test suites.
//!
//! Everything here is deterministic and driven from the test body: no
//! sockets, no sensors, no clocks beyond tokio's.

pub mod capture_sink;
pub mod mock_api;
pub mod mock_geo;
pub mod mock_hub;
pub mod mock_wake;

pub use capture_sink::CaptureSink;
pub use mock_api::{MockShiftApi, MockTrackingApi};
pub use mock_geo::MockGeolocator;
pub use mock_hub::MockHubWire;
pub use mock_wake::MockWake;
