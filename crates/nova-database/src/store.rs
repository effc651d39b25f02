//! Persistence ports consumed by the release services.
//!
//! Each port has a PostgreSQL implementation in [`crate::repositories`] and a
//! process-local one in [`crate::memory`].

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, RejectedTagId, ReleaseEventId, ReleaseId, UserId};
use nova_entity::event::ReleaseEvent;
use nova_entity::notification::Notification;
use nova_entity::project::Project;
use nova_entity::release::{Release, ReleaseStatus};

/// Closes an upload batch as part of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReview {
    /// The asset-uploading event being reviewed.
    pub event_id: ReleaseEventId,
    /// Reviewer comment stored on the batch, if any.
    pub comment: Option<String>,
}

/// Everything one status transition writes, applied atomically.
///
/// The store applies the commit only while the release still holds
/// `expected_status`; otherwise it fails with `IllegalTransition` and
/// writes nothing. A `review` whose batch is already commented fails with
/// `AlreadyCommented`, also writing nothing.
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub release_id: ReleaseId,
    pub project_id: ProjectId,
    /// Status the transition was planned from.
    pub expected_status: ReleaseStatus,
    pub new_status: ReleaseStatus,
    /// Event appended to the log.
    pub event: ReleaseEvent,
    /// Upload batch closed by this transition.
    pub review: Option<UploadReview>,
    /// Overwrites the approval timestamp when set.
    pub approved_at: Option<DateTime<Utc>>,
    /// Demote every other `Latest` release of the project to `Finished`.
    pub demote_latest: bool,
}

/// Release, event, and tag persistence.
#[async_trait]
pub trait ReleaseStore: Send + Sync + Debug + 'static {
    /// Load a release with its full event log.
    async fn find_release(&self, id: ReleaseId) -> AppResult<Option<Release>>;

    /// All releases of a project with their logs, newest first.
    async fn list_project_releases(&self, project_id: ProjectId) -> AppResult<Vec<Release>>;

    /// Whether `version` is used by a release of the project other than `excluding`.
    async fn version_exists(
        &self,
        project_id: ProjectId,
        version: &str,
        excluding: Option<ReleaseId>,
    ) -> AppResult<bool>;

    /// Insert a new release row. Fails with `DuplicateVersion` on a version clash.
    async fn insert_release(&self, release: &Release) -> AppResult<()>;

    /// Overwrite version and notes. Fails with `DuplicateVersion` on a version clash.
    async fn update_details(&self, id: ReleaseId, version: &str, notes: &str) -> AppResult<()>;

    /// Apply one transition atomically. Returns the ids of demoted siblings.
    async fn apply_transition(&self, commit: &TransitionCommit) -> AppResult<Vec<ReleaseId>>;

    /// Set the comment of a rejected tag.
    async fn set_tag_comment(
        &self,
        release_id: ReleaseId,
        tag_id: RejectedTagId,
        comment: &str,
    ) -> AppResult<()>;

    /// Delete a release and all its event rows in one unit. Returns whether it existed.
    async fn delete_release(&self, id: ReleaseId) -> AppResult<bool>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug + 'static {
    /// Persist a fan-out batch.
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()>;

    /// A user's notifications, newest first.
    async fn find_by_user(&self, user_id: UserId, limit: i64) -> AppResult<Vec<Notification>>;

    /// Number of unread notifications for a user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;

    /// Mark every notification about one release as read. Returns the number updated.
    async fn mark_release_read(&self, user_id: UserId, release_id: ReleaseId) -> AppResult<u64>;
}

/// Read access to projects and their membership.
#[async_trait]
pub trait ProjectDirectory: Send + Sync + Debug + 'static {
    /// Load a project with its members.
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>>;

    /// Insert or replace a project and its member list.
    async fn save_project(&self, project: &Project) -> AppResult<()>;
}
