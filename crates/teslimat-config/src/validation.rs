// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty URLs and positive cadence intervals.

use crate::diagnostic::ConfigError;
use crate::model::TeslimatConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all validation errors rather than failing fast.
pub fn validate_config(config: &TeslimatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.api.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    }

    if config.hub.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "hub.url must not be empty".to_string(),
        });
    } else if !config.hub.url.starts_with("ws://") && !config.hub.url.starts_with("wss://") {
        errors.push(ConfigError::Validation {
            message: format!("hub.url `{}` must be a ws:// or wss:// URL", config.hub.url),
        });
    }

    if config.telemetry.sample_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "telemetry.sample_interval_secs must be positive".to_string(),
        });
    }

    if config.telemetry.poll_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "telemetry.poll_timeout_secs must be positive".to_string(),
        });
    }

    if config.telemetry.poll_timeout_secs >= config.telemetry.sample_interval_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "telemetry.poll_timeout_secs ({}) must be shorter than sample_interval_secs ({})",
                config.telemetry.poll_timeout_secs, config.telemetry.sample_interval_secs
            ),
        });
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.telemetry.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "telemetry.log_level `{}` is not one of {:?}",
                config.telemetry.log_level, valid_levels
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
