//! CLI command definitions and dispatch.

pub mod migrate;
pub mod notification;
pub mod project;
pub mod release;

use clap::{Args, Parser, Subcommand};

use nova_core::config::AppConfig;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, UserId};
use nova_service::RequestContext;

use crate::app::App;
use crate::output::OutputFormat;

/// Nova release management
#[derive(Debug, Parser)]
#[command(name = "nova", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Project registration and membership
    Project(project::ProjectArgs),
    /// Release lifecycle
    Release(release::ReleaseArgs),
    /// Notification inbox
    Notification(notification::NotificationArgs),
}

/// Who is acting, and in which project.
#[derive(Debug, Clone, Args)]
pub struct Actor {
    /// Acting user
    #[arg(long = "as", value_name = "USER_ID")]
    pub user: UserId,
    /// Project the command is scoped to
    #[arg(long, value_name = "PROJECT_ID")]
    pub project: ProjectId,
}

impl Actor {
    /// Resolve the actor's role in the project.
    pub async fn context(&self, app: &App) -> AppResult<RequestContext> {
        app.context(self.user, self.project).await
    }
}

impl Cli {
    /// Execute the CLI command against a loaded configuration.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let app = App::build(config).await?;
        self.dispatch(&app).await
    }

    /// Execute the CLI command against already wired services.
    pub async fn dispatch(&self, app: &App) -> AppResult<()> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, app).await,
            Commands::Project(args) => project::execute(args, app, self.format).await,
            Commands::Release(args) => release::execute(args, app, self.format).await,
            Commands::Notification(args) => notification::execute(args, app, self.format).await,
        }
    }
}

/// Ask for confirmation unless `force` is set.
pub(crate) fn confirm(prompt: &str, force: bool) -> AppResult<bool> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| nova_core::error::AppError::internal(format!("Input error: {e}")))
}
