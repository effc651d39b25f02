//! Notification kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A release moved to a new status.
    StatusChanged,
    /// A release was deleted.
    ReleaseDeleted,
    /// A project and all its releases were deleted.
    ProjectDeleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusChanged => "status_changed",
            Self::ReleaseDeleted => "release_deleted",
            Self::ProjectDeleted => "project_deleted",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
