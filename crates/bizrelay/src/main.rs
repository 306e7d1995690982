// SPDX-FileCopyrightText: 2026 Bizrelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bizrelay - Telegram Business to AI completion relay.
//!
//! This is the binary entry point for the bizrelay service.

use clap::{Parser, Subcommand};

mod doctor;
mod serve;
mod shutdown;

/// Bizrelay - Telegram Business to AI completion relay.
#[derive(Parser, Debug)]
#[command(name = "bizrelay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay service.
    Serve,
    /// Run diagnostic checks against the configured adapters.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match bizrelay_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            bizrelay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        None => {
            println!("bizrelay: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
