//! Database migration management commands.

use clap::{Args, Subcommand};

use nova_core::result::AppResult;

use crate::app::App;
use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check database connectivity
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, app: &App) -> AppResult<()> {
    let pool = app.pool()?;
    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            pool.migrate().await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            if pool.health_check().await? {
                output::print_success("Database reachable.");
            } else {
                output::print_warning("Database did not answer the health check.");
            }
        }
    }
    Ok(())
}
