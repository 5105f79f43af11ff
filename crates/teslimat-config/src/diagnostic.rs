// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics rendered via miette.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Figment failed to parse or deserialize the configuration.
    #[error("configuration parse error: {message}")]
    #[diagnostic(
        code(teslimat::config::parse),
        help("check teslimat.toml for unknown keys or wrong value types")
    )]
    Parse {
        /// Figment's own description, including the offending key path.
        message: String,
    },

    /// A semantic constraint failed after deserialization.
    #[error("configuration validation error: {message}")]
    #[diagnostic(code(teslimat::config::validation))]
    Validation {
        /// Human-readable description of the failed constraint.
        message: String,
    },
}

/// Render collected configuration errors to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("{:?}", miette::Report::msg(error.to_string()));
    }
}

/// Convert a figment error (which may aggregate several failures) into
/// one `ConfigError` per underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}
