// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `teslimat shift` command implementation.

use clap::Subcommand;

use teslimat_carrier::CarrierApi;
use teslimat_config::TeslimatConfig;
use teslimat_core::traits::shift_api::ShiftApi;
use teslimat_core::TeslimatError;

/// Shift control actions.
#[derive(Subcommand, Debug)]
pub enum ShiftAction {
    /// Start a shift.
    Start,
    /// End the active shift.
    End,
    /// Show the active shift, if any.
    Status,
}

/// Resolves the configured API credential.
pub fn require_token(config: &TeslimatConfig) -> Result<&str, TeslimatError> {
    config
        .api
        .token
        .as_deref()
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| TeslimatError::Config("api.token is not set".to_string()))
}

/// Runs the `teslimat shift` command.
pub async fn run(config: &TeslimatConfig, action: ShiftAction) -> Result<(), TeslimatError> {
    let token = require_token(config)?;
    let api = CarrierApi::new(&config.api.base_url, token)?;

    match action {
        ShiftAction::Start => {
            let record = api.start_shift(None).await?;
            println!("shift {} started at {}", record.shift_id.0, record.started_at);
        }
        ShiftAction::End => {
            api.end_shift(None).await?;
            println!("shift ended");
        }
        ShiftAction::Status => match api.current_shift().await? {
            Some(record) => {
                println!("active shift {} since {}", record.shift_id.0, record.started_at);
                if let Some(position) = record.last_position {
                    println!(
                        "last position {:.4}, {:.4}",
                        position.latitude, position.longitude
                    );
                }
            }
            None => println!("no active shift"),
        },
    }
    Ok(())
}
