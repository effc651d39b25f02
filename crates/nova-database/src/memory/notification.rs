//! In-memory notification store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use nova_core::result::AppResult;
use nova_core::types::id::{ReleaseId, UserId};
use nova_entity::notification::Notification;

use crate::store::NotificationStore;

/// Notifications in insertion order.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()> {
        self.notifications
            .lock()
            .await
            .extend(notifications.iter().cloned());
        Ok(())
    }

    async fn find_by_user(&self, user_id: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        let notifications = self.notifications.lock().await;
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        let notifications = self.notifications.lock().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn mark_release_read(&self, user_id: UserId, release_id: ReleaseId) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().await;
        let mut updated = 0;
        for n in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && n.release_id == Some(release_id) && !n.is_read)
        {
            n.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}
