//! Notification entity model.

use chrono::{DateTime, Utc};
use nova_core::types::id::{NotificationId, ProjectId, ReleaseId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::kind::NotificationKind;
use crate::release::ReleaseStatus;

/// A per-user notice about a release or project change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Project the change happened in.
    pub project_id: ProjectId,
    /// Project logo at the time of the change.
    pub project_logo: String,
    /// Affected release, absent once the release or project is gone.
    pub release_id: Option<ReleaseId>,
    /// Version of the affected release.
    pub release_version: Option<String>,
    /// New status for status changes.
    pub status: Option<ReleaseStatus>,
    /// What happened.
    pub kind: NotificationKind,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn base(user_id: UserId, project_id: ProjectId, project_logo: &str, kind: NotificationKind) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            project_id,
            project_logo: project_logo.to_string(),
            release_id: None,
            release_version: None,
            status: None,
            kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// A status-changed notification.
    pub fn status_changed(
        user_id: UserId,
        project_id: ProjectId,
        project_logo: &str,
        release_id: ReleaseId,
        version: &str,
        status: ReleaseStatus,
    ) -> Self {
        Self {
            release_id: Some(release_id),
            release_version: Some(version.to_string()),
            status: Some(status),
            ..Self::base(user_id, project_id, project_logo, NotificationKind::StatusChanged)
        }
    }

    /// A release-deleted notification. Carries the version only.
    pub fn release_deleted(user_id: UserId, project_id: ProjectId, project_logo: &str, version: &str) -> Self {
        Self {
            release_version: Some(version.to_string()),
            ..Self::base(user_id, project_id, project_logo, NotificationKind::ReleaseDeleted)
        }
    }

    /// A project-deleted notification.
    pub fn project_deleted(user_id: UserId, project_id: ProjectId, project_logo: &str) -> Self {
        Self::base(user_id, project_id, project_logo, NotificationKind::ProjectDeleted)
    }
}
