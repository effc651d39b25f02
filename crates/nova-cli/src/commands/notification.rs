//! Notification inbox commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use nova_core::result::AppResult;
use nova_core::types::id::{ReleaseId, UserId};
use nova_entity::notification::Notification;

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Inbox owner
    #[arg(long = "as", value_name = "USER_ID")]
    pub user: UserId,

    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List notifications, newest first
    List {
        /// Maximum number of notifications
        #[arg(short, long)]
        limit: Option<i64>,
    },
    /// Count unread notifications
    Unread,
    /// Mark every notification of a release as read
    Read {
        release: ReleaseId,
    },
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    id: String,
    kind: &'static str,
    project_id: String,
    release: String,
    status: String,
    read: bool,
    created_at: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.as_str(),
            project_id: n.project_id.to_string(),
            release: n.release_version.clone().unwrap_or_default(),
            status: n.status.map(|s| s.to_string()).unwrap_or_default(),
            read: n.is_read,
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute notification commands
pub async fn execute(args: &NotificationArgs, app: &App, format: OutputFormat) -> AppResult<()> {
    let service = &app.notifications;

    match &args.command {
        NotificationCommand::List { limit } => {
            let inbox = service.list(args.user, *limit).await?;
            let rows: Vec<NotificationRow> = inbox.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
        }
        NotificationCommand::Unread => {
            let count = service.unread_count(args.user).await?;
            output::print_kv("unread", &count.to_string());
        }
        NotificationCommand::Read { release } => {
            let updated = service.mark_release_read(args.user, *release).await?;
            output::print_success(&format!("{updated} notification(s) marked as read"));
        }
    }

    Ok(())
}
