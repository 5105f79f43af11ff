// SPDX-FileCopyrightText: 2026 Teslimat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Teslimat - carrier location tracking and delivery queue client.
//!
//! This is the binary entry point for the Teslimat client.

use clap::{Parser, Subcommand};
use tracing::error;

mod drive;
mod shift;
mod shutdown;
mod sim;
mod track;

use shift::ShiftAction;

/// Teslimat - carrier location tracking and delivery queue client.
#[derive(Parser, Debug)]
#[command(name = "teslimat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Control the carrier shift over the REST API.
    Shift {
        #[command(subcommand)]
        action: ShiftAction,
    },
    /// Run the full carrier loop with a simulated position sensor.
    Drive,
    /// Follow a shipment's carrier and print live location updates.
    Track {
        /// Shipment to follow.
        #[arg(long)]
        shipment: i64,
        /// Carrier to follow; defaults to the shipment's assigned carrier.
        #[arg(long)]
        carrier: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match teslimat_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            teslimat_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.telemetry.log_level);

    let result = match cli.command {
        Commands::Shift { action } => shift::run(&config, action).await,
        Commands::Drive => drive::run(&config).await,
        Commands::Track { shipment, carrier } => track::run(&config, shipment, carrier).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to this
/// workspace and warnings elsewhere.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("teslimat={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = teslimat_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.carrier.display_name, "Kurye");
    }
}
