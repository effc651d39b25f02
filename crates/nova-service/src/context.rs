//! Request context carrying the acting user and their project role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, UserId};
use nova_database::store::ProjectDirectory;
use nova_entity::project::ProjectRole;

/// Who is acting, in which project, with which role.
///
/// The role is resolved once from the project's membership and every
/// service method checks it before touching any state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user.
    pub user_id: UserId,
    /// The project the request is scoped to.
    pub project_id: ProjectId,
    /// The user's role in that project.
    pub role: ProjectRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context from an already resolved role.
    pub fn new(user_id: UserId, project_id: ProjectId, role: ProjectRole) -> Self {
        Self {
            user_id,
            project_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Resolves the user's role from the project directory.
    pub async fn resolve(
        directory: &dyn ProjectDirectory,
        user_id: UserId,
        project_id: ProjectId,
    ) -> AppResult<Self> {
        let project = directory
            .find_project(project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;
        let role = project.role_of(user_id).ok_or_else(|| {
            AppError::authorization(format!("User {user_id} is not a member of the project"))
        })?;
        Ok(Self::new(user_id, project_id, role))
    }

    /// Requires the author or a vendor.
    pub fn require_vendor_side(&self, action: &str) -> AppResult<()> {
        if self.role.is_vendor_side() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role {} may not {action}",
                self.role
            )))
        }
    }

    /// Requires a customer or a tester.
    pub fn require_reviewer(&self, action: &str) -> AppResult<()> {
        if self.role.is_reviewer() {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role {} may not {action}",
                self.role
            )))
        }
    }
}
