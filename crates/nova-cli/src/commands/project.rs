//! Project registration commands.
//!
//! Membership is owned by an external layer; these commands seed the
//! project directory so release commands can resolve roles.

use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, UserId};
use nova_database::store::ProjectDirectory;
use nova_entity::project::{MemberRole, Project, ProjectMember};

use crate::app::App;
use crate::output::{self, OutputFormat};

/// Arguments for project commands
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Register a project
    Create {
        /// Project name
        name: String,
        /// Project author
        #[arg(long)]
        author: UserId,
        /// Logo URL shown in reports and notifications
        #[arg(long, default_value = "")]
        logo: String,
        /// Use this id instead of a generated one
        #[arg(long)]
        id: Option<ProjectId>,
    },
    /// Show a project with its members
    Show {
        /// Project id
        project: ProjectId,
    },
    /// Add or change a member
    AddMember {
        /// Project id
        project: ProjectId,
        /// Member user id
        user: UserId,
        /// Member role
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// Remove a member
    RemoveMember {
        /// Project id
        project: ProjectId,
        /// Member user id
        user: UserId,
    },
}

/// Member role as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Vendor,
    Customer,
    Tester,
}

impl From<RoleArg> for MemberRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Vendor => MemberRole::Vendor,
            RoleArg::Customer => MemberRole::Customer,
            RoleArg::Tester => MemberRole::Tester,
        }
    }
}

/// Member display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// User ID
    user_id: String,
    /// Role
    role: String,
}

/// Execute project commands
pub async fn execute(args: &ProjectArgs, app: &App, format: OutputFormat) -> AppResult<()> {
    let directory = &app.stores.projects;

    match &args.command {
        ProjectCommand::Create {
            name,
            author,
            logo,
            id,
        } => {
            if name.trim().is_empty() {
                return Err(AppError::validation("Project name is required"));
            }
            let project = Project {
                id: id.unwrap_or_default(),
                name: name.trim().to_string(),
                logo_url: logo.clone(),
                author_id: *author,
                members: Vec::new(),
            };
            directory.save_project(&project).await?;
            output::print_success(&format!("Project '{}' registered (id: {})", project.name, project.id));
        }
        ProjectCommand::Show { project } => {
            let project = find(app, *project).await?;
            output::print_kv("id", &project.id.to_string());
            output::print_kv("name", &project.name);
            output::print_kv("logo", &project.logo_url);
            output::print_kv("author", &project.author_id.to_string());
            let rows: Vec<MemberRow> = project
                .members
                .iter()
                .map(|m| MemberRow {
                    user_id: m.user_id.to_string(),
                    role: format!("{:?}", m.role),
                })
                .collect();
            output::print_list(&rows, format);
        }
        ProjectCommand::AddMember {
            project,
            user,
            role,
        } => {
            let mut project = find(app, *project).await?;
            if project.author_id == *user {
                return Err(AppError::validation("The author cannot also be a member"));
            }
            project.members.retain(|m| m.user_id != *user);
            project.members.push(ProjectMember {
                user_id: *user,
                role: (*role).into(),
            });
            directory.save_project(&project).await?;
            output::print_success(&format!("User {user} added to '{}' as {role:?}", project.name));
        }
        ProjectCommand::RemoveMember { project, user } => {
            let mut project = find(app, *project).await?;
            let before = project.members.len();
            project.members.retain(|m| m.user_id != *user);
            if project.members.len() == before {
                return Err(AppError::not_found(format!("User {user} is not a member")));
            }
            directory.save_project(&project).await?;
            output::print_success(&format!("User {user} removed from '{}'", project.name));
        }
    }

    Ok(())
}

async fn find(app: &App, project_id: ProjectId) -> AppResult<Project> {
    app.stores
        .projects
        .find_project(project_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))
}
