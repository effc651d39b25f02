//! Per-user notification inbox.

use std::sync::Arc;

use tracing::info;

use nova_core::result::AppResult;
use nova_core::types::id::{ReleaseId, UserId};
use nova_database::store::NotificationStore;
use nova_entity::notification::Notification;

/// Default number of notifications returned by [`NotificationService::list`].
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Reads and acknowledges a user's notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Lists the user's notifications, newest first.
    pub async fn list(&self, user_id: UserId, limit: Option<i64>) -> AppResult<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0);
        self.store.find_by_user(user_id, limit).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, user_id: UserId) -> AppResult<i64> {
        self.store.count_unread(user_id).await
    }

    /// Marks every notification about a release as read.
    pub async fn mark_release_read(&self, user_id: UserId, release_id: ReleaseId) -> AppResult<u64> {
        let updated = self.store.mark_release_read(user_id, release_id).await?;
        info!(%user_id, %release_id, updated, "Marked release notifications read");
        Ok(updated)
    }
}
