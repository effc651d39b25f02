//! Release repository implementation.
//!
//! The event log is stored table-per-variant: a base row in
//! `release_events` plus one row in `asset_uploading_events` or
//! `rejected_release_events` for the payload-carrying variants.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use nova_core::error::{AppError, ErrorKind};
use nova_core::result::AppResult;
use nova_core::types::id::{AssetId, ProjectId, RejectedTagId, ReleaseEventId, ReleaseId};
use nova_entity::event::{
    AssetUploaded, AssetUploading, RejectedTag, Rejection, ReleaseEvent, ReleaseEventKind,
    ReleaseTag,
};
use nova_entity::release::{Release, ReleaseStatus};

use crate::store::{ReleaseStore, TransitionCommit};

const RELEASE_COLUMNS: &str = "id, project_id, version, status, notes, created_at, approved_at";

/// Repository for releases and their event logs.
#[derive(Debug, Clone)]
pub struct ReleaseRepository {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: ReleaseEventId,
    release_id: ReleaseId,
    kind: String,
    status: ReleaseStatus,
    occurred_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct UploadRow {
    event_id: ReleaseEventId,
    comment: Option<String>,
    commented: bool,
}

#[derive(Debug, FromRow)]
struct AssetRow {
    id: AssetId,
    event_id: ReleaseEventId,
    storage_path: String,
    file_name: String,
    size_bytes: i64,
}

#[derive(Debug, FromRow)]
struct RejectionRow {
    event_id: ReleaseEventId,
    reasons: String,
}

#[derive(Debug, FromRow)]
struct TagRow {
    id: RejectedTagId,
    event_id: ReleaseEventId,
    tag: ReleaseTag,
    comment: Option<String>,
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// Map a unique violation on the version constraint to `DuplicateVersion`.
fn version_conflict(version: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
            AppError::duplicate_version(format!("Version '{version}' already exists in project"))
        } else {
            AppError::with_source(ErrorKind::Database, "Failed to write release", e)
        }
    }
}

impl ReleaseRepository {
    /// Create a new release repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load and assemble the event logs of the given releases, oldest first.
    async fn load_events(
        &self,
        release_ids: &[Uuid],
    ) -> AppResult<HashMap<ReleaseId, Vec<ReleaseEvent>>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, release_id, kind, status, occurred_at FROM release_events \
             WHERE release_id = ANY($1) ORDER BY seq",
        )
        .bind(release_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load release events"))?;

        if rows.is_empty() {
            return Ok(HashMap::new());
        }
        let event_ids: Vec<Uuid> = rows.iter().map(|r| r.id.into_uuid()).collect();

        let uploads = sqlx::query_as::<_, UploadRow>(
            "SELECT event_id, comment, commented FROM asset_uploading_events WHERE event_id = ANY($1)",
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load upload events"))?;

        let assets = sqlx::query_as::<_, AssetRow>(
            "SELECT id, event_id, storage_path, file_name, size_bytes FROM assets_uploaded \
             WHERE event_id = ANY($1) ORDER BY position",
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load uploaded assets"))?;

        let rejections = sqlx::query_as::<_, RejectionRow>(
            "SELECT event_id, reasons FROM rejected_release_events WHERE event_id = ANY($1)",
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load rejection events"))?;

        let tags = sqlx::query_as::<_, TagRow>(
            "SELECT id, event_id, tag, comment FROM rejected_tags \
             WHERE event_id = ANY($1) ORDER BY position",
        )
        .bind(&event_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load rejected tags"))?;

        assemble_events(rows, uploads, assets, rejections, tags)
    }

    async fn attach_events(&self, mut releases: Vec<Release>) -> AppResult<Vec<Release>> {
        let ids: Vec<Uuid> = releases.iter().map(|r| r.id.into_uuid()).collect();
        let mut events = self.load_events(&ids).await?;
        for release in &mut releases {
            release.events = events.remove(&release.id).unwrap_or_default();
        }
        Ok(releases)
    }
}

/// Build typed events from the per-table rows.
fn assemble_events(
    rows: Vec<EventRow>,
    uploads: Vec<UploadRow>,
    assets: Vec<AssetRow>,
    rejections: Vec<RejectionRow>,
    tags: Vec<TagRow>,
) -> AppResult<HashMap<ReleaseId, Vec<ReleaseEvent>>> {
    let mut uploads: HashMap<ReleaseEventId, UploadRow> =
        uploads.into_iter().map(|u| (u.event_id, u)).collect();
    let mut rejections: HashMap<ReleaseEventId, RejectionRow> =
        rejections.into_iter().map(|r| (r.event_id, r)).collect();

    let mut assets_by_event: HashMap<ReleaseEventId, Vec<AssetUploaded>> = HashMap::new();
    for a in assets {
        assets_by_event.entry(a.event_id).or_default().push(AssetUploaded {
            id: a.id,
            storage_path: a.storage_path,
            file_name: a.file_name,
            size_bytes: a.size_bytes,
        });
    }
    let mut tags_by_event: HashMap<ReleaseEventId, Vec<RejectedTag>> = HashMap::new();
    for t in tags {
        tags_by_event.entry(t.event_id).or_default().push(RejectedTag {
            id: t.id,
            tag: t.tag,
            comment: t.comment,
        });
    }

    let mut out: HashMap<ReleaseId, Vec<ReleaseEvent>> = HashMap::new();
    for row in rows {
        let kind = match row.kind.as_str() {
            "standard" => ReleaseEventKind::Standard { status: row.status },
            "asset_uploading" => {
                let upload = uploads.remove(&row.id).ok_or_else(|| {
                    AppError::database(format!("Upload payload missing for event {}", row.id))
                })?;
                ReleaseEventKind::AssetUploading(AssetUploading {
                    assets: assets_by_event.remove(&row.id).unwrap_or_default(),
                    comment: upload.comment,
                    commented: upload.commented,
                })
            }
            "rejected" => {
                let rejection = rejections.remove(&row.id).ok_or_else(|| {
                    AppError::database(format!("Rejection payload missing for event {}", row.id))
                })?;
                ReleaseEventKind::Rejected(Rejection {
                    reasons: rejection.reasons,
                    tags: tags_by_event.remove(&row.id).unwrap_or_default(),
                })
            }
            other => {
                return Err(AppError::database(format!(
                    "Unknown event kind '{other}' for event {}",
                    row.id
                )));
            }
        };
        out.entry(row.release_id).or_default().push(ReleaseEvent {
            id: row.id,
            release_id: row.release_id,
            occurred_at: row.occurred_at,
            kind,
        });
    }
    Ok(out)
}

/// Insert the base row and variant rows of one event.
async fn insert_event(tx: &mut Transaction<'_, Postgres>, event: &ReleaseEvent) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO release_events (id, release_id, kind, status, occurred_at) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(event.id)
    .bind(event.release_id)
    .bind(event.kind_name())
    .bind(event.status())
    .bind(event.occurred_at)
    .execute(&mut **tx)
    .await
    .map_err(db_error("Failed to insert release event"))?;

    match &event.kind {
        ReleaseEventKind::Standard { .. } => {}
        ReleaseEventKind::AssetUploading(upload) => {
            sqlx::query(
                "INSERT INTO asset_uploading_events (event_id, comment, commented) VALUES ($1, $2, $3)",
            )
            .bind(event.id)
            .bind(upload.comment.as_deref())
            .bind(upload.commented)
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert upload event"))?;

            for (position, asset) in upload.assets.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO assets_uploaded (id, event_id, position, storage_path, file_name, size_bytes) \
                     VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(asset.id)
                .bind(event.id)
                .bind(position as i32)
                .bind(&asset.storage_path)
                .bind(&asset.file_name)
                .bind(asset.size_bytes)
                .execute(&mut **tx)
                .await
                .map_err(db_error("Failed to insert uploaded asset"))?;
            }
        }
        ReleaseEventKind::Rejected(rejection) => {
            sqlx::query("INSERT INTO rejected_release_events (event_id, reasons) VALUES ($1, $2)")
                .bind(event.id)
                .bind(&rejection.reasons)
                .execute(&mut **tx)
                .await
                .map_err(db_error("Failed to insert rejection event"))?;

            for (position, tag) in rejection.tags.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO rejected_tags (id, event_id, position, tag, comment) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(tag.id)
                .bind(event.id)
                .bind(position as i32)
                .bind(tag.tag)
                .bind(tag.comment.as_deref())
                .execute(&mut **tx)
                .await
                .map_err(db_error("Failed to insert rejected tag"))?;
            }
        }
    }
    Ok(())
}

#[async_trait]
impl ReleaseStore for ReleaseRepository {
    async fn find_release(&self, id: ReleaseId) -> AppResult<Option<Release>> {
        let release = sqlx::query_as::<_, Release>(&format!(
            "SELECT {RELEASE_COLUMNS} FROM releases WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find release"))?;

        match release {
            Some(release) => Ok(self.attach_events(vec![release]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_project_releases(&self, project_id: ProjectId) -> AppResult<Vec<Release>> {
        let releases = sqlx::query_as::<_, Release>(&format!(
            "SELECT {RELEASE_COLUMNS} FROM releases WHERE project_id = $1 ORDER BY created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list releases"))?;

        self.attach_events(releases).await
    }

    async fn version_exists(
        &self,
        project_id: ProjectId,
        version: &str,
        excluding: Option<ReleaseId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM releases WHERE project_id = $1 AND version = $2 \
             AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(project_id)
        .bind(version)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check release version"))
    }

    async fn insert_release(&self, release: &Release) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO releases (id, project_id, version, status, notes, created_at, approved_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(release.id)
        .bind(release.project_id)
        .bind(&release.version)
        .bind(release.status)
        .bind(&release.notes)
        .bind(release.created_at)
        .bind(release.approved_at)
        .execute(&self.pool)
        .await
        .map_err(version_conflict(&release.version))?;
        Ok(())
    }

    async fn update_details(&self, id: ReleaseId, version: &str, notes: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE releases SET version = $2, notes = $3 WHERE id = $1")
            .bind(id)
            .bind(version)
            .bind(notes)
            .execute(&self.pool)
            .await
            .map_err(version_conflict(version))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Release {id} not found")));
        }
        Ok(())
    }

    async fn apply_transition(&self, commit: &TransitionCommit) -> AppResult<Vec<ReleaseId>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let current = sqlx::query_scalar::<_, ReleaseStatus>(
            "SELECT status FROM releases WHERE id = $1 FOR UPDATE",
        )
        .bind(commit.release_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock release"))?
        .ok_or_else(|| AppError::not_found(format!("Release {} not found", commit.release_id)))?;

        if current != commit.expected_status {
            return Err(AppError::illegal_transition(format!(
                "Release moved to {current} concurrently"
            )));
        }

        let mut demoted = Vec::new();
        if commit.demote_latest {
            demoted = sqlx::query_scalar::<_, ReleaseId>(
                "UPDATE releases SET status = 'Finished' \
                 WHERE project_id = $1 AND status = 'Latest' AND id <> $2 RETURNING id",
            )
            .bind(commit.project_id)
            .bind(commit.release_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("Failed to demote latest releases"))?;
        }

        if let Some(review) = &commit.review {
            let result = sqlx::query(
                "UPDATE asset_uploading_events SET commented = TRUE, comment = COALESCE($2, comment) \
                 WHERE event_id = $1 AND commented = FALSE",
            )
            .bind(review.event_id)
            .bind(review.comment.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to close upload batch"))?;
            if result.rows_affected() == 0 {
                return Err(AppError::already_commented(
                    "Upload batch has already been reviewed",
                ));
            }
        }

        sqlx::query(
            "UPDATE releases SET status = $2, approved_at = COALESCE($3, approved_at) WHERE id = $1",
        )
        .bind(commit.release_id)
        .bind(commit.new_status)
        .bind(commit.approved_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AppError::illegal_transition("Another release of the project became Latest concurrently")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to update release status", e)
            }
        })?;

        insert_event(&mut tx, &commit.event).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transition"))?;
        Ok(demoted)
    }

    async fn set_tag_comment(
        &self,
        release_id: ReleaseId,
        tag_id: RejectedTagId,
        comment: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE rejected_tags t SET comment = $3 FROM release_events e \
             WHERE t.id = $2 AND t.event_id = e.id AND e.release_id = $1",
        )
        .bind(release_id)
        .bind(tag_id)
        .bind(comment)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to annotate rejected tag"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Rejected tag {tag_id} not found")));
        }
        Ok(())
    }

    async fn delete_release(&self, id: ReleaseId) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let events = "SELECT id FROM release_events WHERE release_id = $1";
        let statements = [
            format!("DELETE FROM assets_uploaded WHERE event_id IN ({events})"),
            format!("DELETE FROM asset_uploading_events WHERE event_id IN ({events})"),
            format!("DELETE FROM rejected_tags WHERE event_id IN ({events})"),
            format!("DELETE FROM rejected_release_events WHERE event_id IN ({events})"),
            "DELETE FROM release_events WHERE release_id = $1".to_string(),
        ];
        for statement in &statements {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete release events"))?;
        }

        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete release"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit release deletion"))?;
        Ok(result.rows_affected() > 0)
    }
}
