// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hub connection management for the Teslimat tracking client.
//!
//! The location hub is an external real-time broadcast service consumed
//! over one persistent duplex stream per client role. This crate provides
//! the wire abstraction ([`HubWire`]/[`HubDuplex`]), a websocket wire
//! ([`WsWire`]), and the reconnecting connection manager
//! ([`HubConnection`]).

pub mod backoff;
pub mod manager;
pub mod wire;
pub mod ws;

pub use backoff::{reconnect_delay, RECONNECT_DELAYS_MS};
pub use manager::HubConnection;
pub use wire::{HubDuplex, HubEvent, HubInvoke, HubWire};
pub use ws::WsWire;
