// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Teslimat tracking client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Teslimat configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; credentials have no defaults and fail closed when absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TeslimatConfig {
    /// REST API surface settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Location hub settings.
    #[serde(default)]
    pub hub: HubConfig,

    /// Carrier identity settings.
    #[serde(default)]
    pub carrier: CarrierConfig,

    /// Telemetry cadence settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the carrier API.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Bearer credential. `None` means every call fails closed.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            token: None,
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8081/api/carrier".to_string()
}

/// Location hub configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// URL of the real-time location hub.
    #[serde(default = "default_hub_url")]
    pub url: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
        }
    }
}

fn default_hub_url() -> String {
    "ws://localhost:8081/hubs/location".to_string()
}

/// Carrier identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CarrierConfig {
    /// Numeric carrier id, as assigned by the marketplace.
    #[serde(default)]
    pub id: i64,

    /// Display name announced to the hub on shift start.
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            id: 0,
            display_name: default_display_name(),
        }
    }
}

fn default_display_name() -> String {
    "Kurye".to_string()
}

/// Telemetry cadence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Seconds between periodic location transmissions.
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u64,

    /// Seconds to wait for a one-shot position before falling back to the
    /// cached watch fix.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_interval_secs: default_sample_interval_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

fn default_sample_interval_secs() -> u64 {
    30
}

fn default_poll_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_telemetry_cadence() {
        let config = TeslimatConfig::default();
        assert_eq!(config.telemetry.sample_interval_secs, 30);
        assert_eq!(config.telemetry.poll_timeout_secs, 10);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn token_defaults_to_none() {
        let config = TeslimatConfig::default();
        assert!(config.api.token.is_none());
    }
}
