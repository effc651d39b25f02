//! Best-effort notification fan-out to project participants.

use std::sync::Arc;

use tracing::{debug, warn};

use nova_core::types::id::UserId;
use nova_database::store::NotificationStore;
use nova_entity::notification::Notification;
use nova_entity::project::Project;
use nova_entity::release::{Release, ReleaseStatus};

/// Writes one notification per participant other than the actor.
///
/// Delivery failures are logged and swallowed; they never fail the change
/// that triggered them.
#[derive(Debug, Clone)]
pub struct NotificationFanout {
    store: Arc<dyn NotificationStore>,
}

impl NotificationFanout {
    /// Creates a new fan-out over a notification store.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Author and members of `project`, minus `actor`.
    pub fn recipients(project: &Project, actor: UserId) -> Vec<UserId> {
        project
            .participants()
            .into_iter()
            .filter(|id| *id != actor)
            .collect()
    }

    /// Announce that `release` moved to `status`. Returns the number delivered.
    pub async fn status_changed(
        &self,
        project: &Project,
        release: &Release,
        status: ReleaseStatus,
        actor: UserId,
    ) -> usize {
        let batch = Self::recipients(project, actor)
            .into_iter()
            .map(|user_id| {
                Notification::status_changed(
                    user_id,
                    project.id,
                    &project.logo_url,
                    release.id,
                    &release.version,
                    status,
                )
            })
            .collect();
        self.deliver(batch, "status change").await
    }

    /// Announce that a release was deleted.
    pub async fn release_deleted(
        &self,
        project: &Project,
        version: &str,
        actor: UserId,
    ) -> usize {
        let batch = Self::recipients(project, actor)
            .into_iter()
            .map(|user_id| Notification::release_deleted(user_id, project.id, &project.logo_url, version))
            .collect();
        self.deliver(batch, "release deletion").await
    }

    /// Announce that a project was purged.
    pub async fn project_deleted(&self, project: &Project, actor: UserId) -> usize {
        let batch = Self::recipients(project, actor)
            .into_iter()
            .map(|user_id| Notification::project_deleted(user_id, project.id, &project.logo_url))
            .collect();
        self.deliver(batch, "project deletion").await
    }

    async fn deliver(&self, batch: Vec<Notification>, what: &str) -> usize {
        if batch.is_empty() {
            return 0;
        }
        match self.store.insert_batch(&batch).await {
            Ok(()) => {
                debug!(count = batch.len(), what, "Delivered notifications");
                batch.len()
            }
            Err(e) => {
                warn!(error = %e, count = batch.len(), what, "Failed to deliver notifications");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::types::id::ProjectId;
    use nova_database::memory::MemoryNotificationStore;
    use nova_entity::notification::NotificationKind;
    use nova_entity::project::{MemberRole, ProjectMember};

    fn project(author: UserId, members: &[UserId]) -> Project {
        Project {
            id: ProjectId::new(),
            name: "Atlas".into(),
            logo_url: "logo.png".into(),
            author_id: author,
            members: members
                .iter()
                .map(|id| ProjectMember {
                    user_id: *id,
                    role: MemberRole::Customer,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_actor_is_excluded() {
        let store = Arc::new(MemoryNotificationStore::new());
        let fanout = NotificationFanout::new(store.clone());
        let (author, a, b) = (UserId::new(), UserId::new(), UserId::new());
        let project = project(author, &[a, b]);
        let release = Release::new(project.id, "v. 1.0".into(), "n".into());

        let sent = fanout
            .status_changed(&project, &release, ReleaseStatus::New, author)
            .await;
        assert_eq!(sent, 2);
        assert_eq!(store.count_unread(author).await.unwrap(), 0);
        assert_eq!(store.count_unread(a).await.unwrap(), 1);

        let sent = fanout.project_deleted(&project, a).await;
        assert_eq!(sent, 2);
        let inbox = store.find_by_user(author, 10).await.unwrap();
        assert_eq!(inbox[0].kind, NotificationKind::ProjectDeleted);
        assert!(inbox[0].release_id.is_none());
    }
}
