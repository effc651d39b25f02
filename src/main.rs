//! Nova release management entry point.
//!
//! Loads configuration, initialises logging, and dispatches the CLI.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use nova_cli::Cli;
use nova_core::config::AppConfig;
use nova_core::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Starting nova");

    if let Err(e) = cli.execute(&config).await {
        if e.is_client_error() {
            tracing::warn!(error = %e, "Command rejected");
        } else {
            tracing::error!(error = %e, "Command failed");
        }
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load the base file, the `NOVA_ENV` overlay, and `NOVA__` variables.
fn load_configuration(base: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("NOVA_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
