// redcap-export - REDCap per-event CSV export
// Copyright (c) 2025 redcap-export Contributors
// Licensed under the MIT License

use clap::Parser;
use redcap_export::cli::Cli;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let exit_code = match cli.execute().await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    process::exit(exit_code);
}
