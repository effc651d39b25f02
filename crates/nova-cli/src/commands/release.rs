//! Release lifecycle commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{RejectedTagId, ReleaseEventId, ReleaseId};
use nova_entity::event::{ReleaseEvent, ReleaseEventKind, ReleaseTag};
use nova_entity::release::{Release, ReleaseStatus};
use nova_service::release::{
    AddReleaseRequest, AnnotateTagRequest, ApproveAssetsRequest, EditReleaseRequest,
    RejectAssetsRequest, UploadAssetsRequest, UploadFile,
};

use super::{Actor, confirm};
use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for release commands
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    #[command(flatten)]
    pub actor: Actor,

    /// Release subcommand
    #[command(subcommand)]
    pub command: ReleaseCommand,
}

/// Release subcommands
#[derive(Debug, Subcommand)]
pub enum ReleaseCommand {
    /// List the project's releases, newest first
    List,
    /// Show a release with its event log
    Show {
        release: ReleaseId,
    },
    /// Create a release
    Add {
        /// Version, with or without the "v." prefix
        version: String,
        /// Release notes
        #[arg(long)]
        notes: String,
    },
    /// Edit notes and optionally the version
    Edit {
        release: ReleaseId,
        /// New release notes
        #[arg(long)]
        notes: String,
        /// New version
        #[arg(long)]
        version: Option<String>,
    },
    /// Upload an asset batch for review
    Upload {
        release: ReleaseId,
        /// Files to upload, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Note on the batch
        #[arg(long)]
        comment: Option<String>,
    },
    /// Approve an uploaded batch
    Approve {
        release: ReleaseId,
        /// Upload event being approved
        #[arg(long)]
        event: ReleaseEventId,
        /// Review comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject an uploaded batch
    Reject {
        release: ReleaseId,
        /// Upload event being rejected
        #[arg(long)]
        event: ReleaseEventId,
        /// Why the batch is rejected
        #[arg(long)]
        reasons: String,
        /// Rejection tags (bug, issue, layout_change, tip)
        #[arg(long = "tag")]
        tags: Vec<ReleaseTag>,
    },
    /// Comment a tag of the current rejection
    Annotate {
        release: ReleaseId,
        /// Rejected tag id
        #[arg(long)]
        tag: RejectedTagId,
        /// Comment
        #[arg(long)]
        comment: String,
    },
    /// Promote to Alpha, Beta or Latest
    Promote {
        release: ReleaseId,
        /// Target channel
        target: ReleaseStatus,
    },
    /// Delete a release with its assets and reports
    Delete {
        release: ReleaseId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Delete every release of the project
    Purge {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Render the release report
    Report {
        release: ReleaseId,
        /// Report language (en, it)
        #[arg(long)]
        locale: Option<String>,
    },
}

/// Release display row for table output
#[derive(Debug, Serialize, Tabled)]
struct ReleaseRow {
    id: String,
    version: String,
    status: String,
    events: usize,
    created_at: String,
    approved_at: String,
}

impl From<&Release> for ReleaseRow {
    fn from(r: &Release) -> Self {
        Self {
            id: r.id.to_string(),
            version: r.version.clone(),
            status: r.status.to_string(),
            events: r.events.len(),
            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
            approved_at: r
                .approved_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Event display row for table output
#[derive(Debug, Serialize, Tabled)]
struct EventRow {
    id: String,
    kind: &'static str,
    status: String,
    occurred_at: String,
    detail: String,
}

impl From<&ReleaseEvent> for EventRow {
    fn from(e: &ReleaseEvent) -> Self {
        let detail = match &e.kind {
            ReleaseEventKind::Standard { .. } => String::new(),
            ReleaseEventKind::AssetUploading(upload) => {
                let names: Vec<&str> = upload.assets.iter().map(|a| a.file_name.as_str()).collect();
                let state = if upload.commented { "reviewed" } else { "open" };
                format!("{} ({state})", names.join(", "))
            }
            ReleaseEventKind::Rejected(rejection) => {
                let tags: Vec<String> = rejection
                    .tags
                    .iter()
                    .map(|t| format!("{}={}", t.tag, t.id))
                    .collect();
                format!("{} [{}]", rejection.reasons, tags.join(", "))
            }
        };
        Self {
            id: e.id.to_string(),
            kind: e.kind_name(),
            status: e.status().to_string(),
            occurred_at: e.occurred_at.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            detail,
        }
    }
}

/// Execute release commands
pub async fn execute(args: &ReleaseArgs, app: &App, format: OutputFormat) -> AppResult<()> {
    let ctx = args.actor.context(app).await?;
    let service = &app.releases;

    match &args.command {
        ReleaseCommand::List => {
            let releases = service.list_releases(&ctx).await?;
            let rows: Vec<ReleaseRow> = releases.iter().map(ReleaseRow::from).collect();
            output::print_list(&rows, format);
        }
        ReleaseCommand::Show { release } => {
            let release = service.get_release(&ctx, *release).await?;
            print_release(&release, format);
        }
        ReleaseCommand::Add { version, notes } => {
            let release = service
                .add_release(
                    &ctx,
                    AddReleaseRequest {
                        version: version.clone(),
                        notes: notes.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Release '{}' created (id: {})", release.version, release.id));
        }
        ReleaseCommand::Edit {
            release,
            notes,
            version,
        } => {
            let release = service
                .edit_release(
                    &ctx,
                    *release,
                    EditReleaseRequest {
                        version: version.clone(),
                        notes: notes.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Release '{}' updated", release.version));
        }
        ReleaseCommand::Upload {
            release,
            files,
            comment,
        } => {
            let mut batch = Vec::with_capacity(files.len());
            for path in files {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        AppError::validation(format!("Invalid file path: {}", path.display()))
                    })?
                    .to_string();
                let data = tokio::fs::read(path).await?;
                batch.push(UploadFile::new(name, Bytes::from(data)));
            }
            let release = service
                .upload_assets(
                    &ctx,
                    *release,
                    UploadAssetsRequest {
                        files: batch,
                        comment: comment.clone(),
                    },
                )
                .await?;
            let event_id = release
                .last_event()
                .map(|e| e.id.to_string())
                .unwrap_or_default();
            output::print_success(&format!(
                "{} asset(s) uploaded to '{}' (event: {event_id})",
                files.len(),
                release.version
            ));
        }
        ReleaseCommand::Approve {
            release,
            event,
            comment,
        } => {
            let release = service
                .approve_assets(
                    &ctx,
                    *release,
                    ApproveAssetsRequest {
                        event_id: *event,
                        comment: comment.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Release '{}' approved", release.version));
        }
        ReleaseCommand::Reject {
            release,
            event,
            reasons,
            tags,
        } => {
            let release = service
                .reject_assets(
                    &ctx,
                    *release,
                    RejectAssetsRequest {
                        event_id: *event,
                        reasons: reasons.clone(),
                        tags: tags.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Release '{}' rejected", release.version));
        }
        ReleaseCommand::Annotate {
            release,
            tag,
            comment,
        } => {
            service
                .annotate_rejected_tag(
                    &ctx,
                    *release,
                    *tag,
                    AnnotateTagRequest {
                        comment: comment.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Tag {tag} annotated"));
        }
        ReleaseCommand::Promote { release, target } => {
            let release = service.promote(&ctx, *release, *target).await?;
            output::print_success(&format!("Release '{}' is now {}", release.version, release.status));
        }
        ReleaseCommand::Delete { release, force } => {
            if !confirm(&format!("Delete release {release} with all its assets?"), *force)? {
                println!("Cancelled.");
                return Ok(());
            }
            service.delete_release(&ctx, *release).await?;
            output::print_success(&format!("Release {release} deleted"));
        }
        ReleaseCommand::Purge { force } => {
            if !confirm("Delete EVERY release of this project?", *force)? {
                println!("Cancelled.");
                return Ok(());
            }
            let count = service.purge_project(&ctx).await?;
            output::print_success(&format!("{count} release(s) deleted"));
        }
        ReleaseCommand::Report { release, locale } => {
            let handle = app
                .reports
                .generate(&ctx, *release, locale.as_deref())
                .await?;
            if handle.rendered {
                output::print_success(&format!("Report rendered: {}", handle.path));
            } else {
                output::print_success(&format!("Report up to date: {}", handle.path));
            }
        }
    }

    Ok(())
}

fn print_release(release: &Release, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(release).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
        OutputFormat::Table => {
            output::print_item(&ReleaseRow::from(release), format);
            output::print_kv("notes", &release.notes);
            let rows: Vec<EventRow> = release.events.iter().map(EventRow::from).collect();
            output::print_list(&rows, format);
        }
    }
}
