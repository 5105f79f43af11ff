// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./teslimat.toml` > `~/.config/teslimat/teslimat.toml`
//! > `/etc/teslimat/teslimat.toml` with environment variable overrides via
//! `TESLIMAT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TeslimatConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/teslimat/teslimat.toml` (system-wide)
/// 3. `~/.config/teslimat/teslimat.toml` (user XDG config)
/// 4. `./teslimat.toml` (local directory)
/// 5. `TESLIMAT_*` environment variables
pub fn load_config() -> Result<TeslimatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TeslimatConfig::default()))
        .merge(Toml::file("/etc/teslimat/teslimat.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("teslimat/teslimat.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("teslimat.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TeslimatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TeslimatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TeslimatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TeslimatConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TESLIMAT_API_BASE_URL` must map to
/// `api.base_url`, not `api.base.url`.
fn env_provider() -> Env {
    Env::prefixed("TESLIMAT_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("hub_", "hub.", 1)
            .replacen("carrier_", "carrier.", 1)
            .replacen("telemetry_", "telemetry.", 1);
        mapped.into()
    })
}
