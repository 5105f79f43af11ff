// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Teslimat configuration system.

use teslimat_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[api]
base_url = "https://api.example.com/api/carrier"
token = "bearer-abc"

[hub]
url = "wss://api.example.com/hubs/location"

[carrier]
id = 42
display_name = "Test Kurye"

[telemetry]
sample_interval_secs = 15
poll_timeout_secs = 5
log_level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.api.base_url, "https://api.example.com/api/carrier");
    assert_eq!(config.api.token.as_deref(), Some("bearer-abc"));
    assert_eq!(config.hub.url, "wss://api.example.com/hubs/location");
    assert_eq!(config.carrier.id, 42);
    assert_eq!(config.carrier.display_name, "Test Kurye");
    assert_eq!(config.telemetry.sample_interval_secs, 15);
    assert_eq!(config.telemetry.poll_timeout_secs, 5);
    assert_eq!(config.telemetry.log_level, "debug");
}

/// Empty config falls back to compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should deserialize");
    assert_eq!(config.telemetry.sample_interval_secs, 30);
    assert_eq!(config.telemetry.poll_timeout_secs, 10);
    assert_eq!(config.carrier.display_name, "Kurye");
    assert!(config.api.token.is_none());
}

/// An explicit config file path loads on top of the compiled defaults.
#[test]
fn explicit_file_path_loads_and_keeps_defaults() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("temp config file");
    writeln!(
        file,
        r#"
[carrier]
id = 42

[api]
token = "bearer-abc"
"#
    )
    .expect("write temp config");

    let config = load_config_from_path(file.path()).expect("file should load");
    assert_eq!(config.carrier.id, 42);
    assert_eq!(config.api.token.as_deref(), Some("bearer-abc"));
    // Untouched sections keep their defaults.
    assert_eq!(config.telemetry.sample_interval_secs, 30);
}

/// Unknown keys are rejected, not silently ignored.
#[test]
fn unknown_key_is_rejected() {
    let toml = r#"
[telemetry]
sample_interva_secs = 30
"#;
    let result = load_config_from_str(toml);
    assert!(result.is_err(), "typo'd key should produce an error");
}

/// Validation catches a poll timeout that swallows the whole interval.
#[test]
fn validation_rejects_oversized_poll_timeout() {
    let toml = r#"
[telemetry]
sample_interval_secs = 10
poll_timeout_secs = 10
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("must be shorter")));
}

/// An environment-style override beats the value from TOML.
#[test]
fn env_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };
    use teslimat_config::TeslimatConfig;

    let toml_content = r#"
[carrier]
id = 1
"#;

    // Simulate TESLIMAT_CARRIER_ID by merging with dot notation, the same
    // shape env_provider() produces.
    let config: TeslimatConfig = Figment::new()
        .merge(Serialized::defaults(TeslimatConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("carrier.id", 7))
        .extract()
        .expect("env override should merge");

    assert_eq!(config.carrier.id, 7);
}

/// Underscore-containing keys map to one field, not nested tables:
/// `TESLIMAT_API_BASE_URL` means `api.base_url`.
#[test]
fn env_mapping_keeps_underscored_field_names() {
    use figment::{providers::Serialized, Figment};
    use teslimat_config::TeslimatConfig;

    let config: TeslimatConfig = Figment::new()
        .merge(Serialized::defaults(TeslimatConfig::default()))
        .merge(("api.base_url", "https://env.example.com/api/carrier"))
        .extract()
        .expect("dot notation should reach base_url");

    assert_eq!(config.api.base_url, "https://env.example.com/api/carrier");
}

/// Validation rejects a non-websocket hub URL.
#[test]
fn validation_rejects_http_hub_url() {
    let toml = r#"
[hub]
url = "http://localhost:8081/hubs/location"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
}
