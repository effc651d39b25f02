//! Notification repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use nova_core::error::{AppError, ErrorKind};
use nova_core::result::AppResult;
use nova_core::types::id::{ReleaseId, UserId};
use nova_entity::notification::Notification;

use crate::store::NotificationStore;

/// Repository for notification rows.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn insert_batch(&self, notifications: &[Notification]) -> AppResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        for n in notifications {
            sqlx::query(
                "INSERT INTO notifications \
                 (id, user_id, project_id, project_logo, release_id, release_version, status, kind, is_read, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(n.id)
            .bind(n.user_id)
            .bind(n.project_id)
            .bind(&n.project_logo)
            .bind(n.release_id)
            .bind(n.release_version.as_deref())
            .bind(n.status)
            .bind(n.kind)
            .bind(n.is_read)
            .bind(n.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create notification", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit notifications", e)
        })
    }

    async fn find_by_user(&self, user_id: UserId, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn mark_release_read(&self, user_id: UserId, release_id: ReleaseId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE user_id = $1 AND release_id = $2 AND is_read = FALSE",
        )
        .bind(user_id)
        .bind(release_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }
}
