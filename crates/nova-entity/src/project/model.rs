//! Project entity model.

use nova_core::types::id::{ProjectId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::{MemberRole, ProjectRole};

/// A project member row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectMember {
    pub user_id: UserId,
    pub role: MemberRole,
}

/// A project with its author and members.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// Display name. Also the prefix of generated report files.
    pub name: String,
    /// Logo shown in reports and notifications.
    pub logo_url: String,
    /// Project owner.
    pub author_id: UserId,
    /// Members other than the author.
    #[sqlx(skip)]
    #[serde(default)]
    pub members: Vec<ProjectMember>,
}

impl Project {
    /// Effective role of `user_id`, `None` for non-participants.
    pub fn role_of(&self, user_id: UserId) -> Option<ProjectRole> {
        if self.author_id == user_id {
            return Some(ProjectRole::Author);
        }
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role.into())
    }

    /// Author followed by every member, without duplicates.
    pub fn participants(&self) -> Vec<UserId> {
        let mut ids = vec![self.author_id];
        for member in &self.members {
            if !ids.contains(&member.user_id) {
                ids.push(member.user_id);
            }
        }
        ids
    }
}
