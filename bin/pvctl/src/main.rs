use std::process::ExitCode;

use clap::Parser;
use pv_client::{ClientConfig, tracing::init_tracing};

mod cli;
mod render;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    // Load configuration from environment variables
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.environment);
    tracing::debug!(api = %config.api_base_url, "configuration loaded");

    match cli::run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
