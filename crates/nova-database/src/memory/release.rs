//! In-memory release store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, RejectedTagId, ReleaseId};
use nova_entity::release::{Release, ReleaseStatus};

use crate::store::{ReleaseStore, TransitionCommit};

/// Releases keyed by id, each holding its own event log.
#[derive(Debug, Default)]
pub struct MemoryReleaseStore {
    releases: Mutex<HashMap<ReleaseId, Release>>,
}

impl MemoryReleaseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn version_taken(
    releases: &HashMap<ReleaseId, Release>,
    project_id: ProjectId,
    version: &str,
    excluding: Option<ReleaseId>,
) -> bool {
    releases.values().any(|r| {
        r.project_id == project_id && r.version == version && Some(r.id) != excluding
    })
}

#[async_trait]
impl ReleaseStore for MemoryReleaseStore {
    async fn find_release(&self, id: ReleaseId) -> AppResult<Option<Release>> {
        Ok(self.releases.lock().await.get(&id).cloned())
    }

    async fn list_project_releases(&self, project_id: ProjectId) -> AppResult<Vec<Release>> {
        let releases = self.releases.lock().await;
        let mut out: Vec<Release> = releases
            .values()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(out)
    }

    async fn version_exists(
        &self,
        project_id: ProjectId,
        version: &str,
        excluding: Option<ReleaseId>,
    ) -> AppResult<bool> {
        let releases = self.releases.lock().await;
        Ok(version_taken(&releases, project_id, version, excluding))
    }

    async fn insert_release(&self, release: &Release) -> AppResult<()> {
        let mut releases = self.releases.lock().await;
        if version_taken(&releases, release.project_id, &release.version, None) {
            return Err(AppError::duplicate_version(format!(
                "Version '{}' already exists in project",
                release.version
            )));
        }
        let mut row = release.clone();
        row.events.clear();
        releases.insert(row.id, row);
        Ok(())
    }

    async fn update_details(&self, id: ReleaseId, version: &str, notes: &str) -> AppResult<()> {
        let mut releases = self.releases.lock().await;
        let project_id = releases
            .get(&id)
            .map(|r| r.project_id)
            .ok_or_else(|| AppError::not_found(format!("Release {id} not found")))?;
        if version_taken(&releases, project_id, version, Some(id)) {
            return Err(AppError::duplicate_version(format!(
                "Version '{version}' already exists in project"
            )));
        }
        if let Some(release) = releases.get_mut(&id) {
            release.version = version.to_string();
            release.notes = notes.to_string();
        }
        Ok(())
    }

    async fn apply_transition(&self, commit: &TransitionCommit) -> AppResult<Vec<ReleaseId>> {
        let mut releases = self.releases.lock().await;

        let release = releases
            .get(&commit.release_id)
            .ok_or_else(|| AppError::not_found(format!("Release {} not found", commit.release_id)))?;
        if release.status != commit.expected_status {
            return Err(AppError::illegal_transition(format!(
                "Release moved to {} concurrently",
                release.status
            )));
        }
        if let Some(review) = &commit.review {
            let upload = release.find_upload(review.event_id).ok_or_else(|| {
                AppError::not_found(format!("Upload event {} not found", review.event_id))
            })?;
            if upload.commented {
                return Err(AppError::already_commented(
                    "Upload batch has already been reviewed",
                ));
            }
        }

        let mut demoted = Vec::new();
        if commit.demote_latest {
            for sibling in releases.values_mut() {
                if sibling.project_id == commit.project_id
                    && sibling.id != commit.release_id
                    && sibling.status == ReleaseStatus::Latest
                {
                    sibling.status = ReleaseStatus::Finished;
                    demoted.push(sibling.id);
                }
            }
        }

        let Some(release) = releases.get_mut(&commit.release_id) else {
            return Err(AppError::not_found(format!(
                "Release {} not found",
                commit.release_id
            )));
        };
        if let Some(review) = &commit.review {
            let upload = release
                .events
                .iter_mut()
                .find(|e| e.id == review.event_id)
                .and_then(|e| e.as_upload_mut());
            if let Some(upload) = upload {
                upload.commented = true;
                if review.comment.is_some() {
                    upload.comment = review.comment.clone();
                }
            }
        }
        release.status = commit.new_status;
        if commit.approved_at.is_some() {
            release.approved_at = commit.approved_at;
        }
        release.events.push(commit.event.clone());
        Ok(demoted)
    }

    async fn set_tag_comment(
        &self,
        release_id: ReleaseId,
        tag_id: RejectedTagId,
        comment: &str,
    ) -> AppResult<()> {
        let mut releases = self.releases.lock().await;
        let tag = releases
            .get_mut(&release_id)
            .into_iter()
            .flat_map(|r| r.events.iter_mut())
            .filter_map(|e| e.as_rejection_mut())
            .flat_map(|rj| rj.tags.iter_mut())
            .find(|t| t.id == tag_id)
            .ok_or_else(|| AppError::not_found(format!("Rejected tag {tag_id} not found")))?;
        tag.comment = Some(comment.to_string());
        Ok(())
    }

    async fn delete_release(&self, id: ReleaseId) -> AppResult<bool> {
        Ok(self.releases.lock().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nova_core::error::ErrorKind;
    use nova_entity::event::ReleaseEvent;

    use crate::store::UploadReview;

    fn release(project_id: ProjectId, version: &str, status: ReleaseStatus) -> Release {
        let mut r = Release::new(project_id, version.into(), "notes".into());
        r.status = status;
        r
    }

    fn promote(r: &Release) -> TransitionCommit {
        TransitionCommit {
            release_id: r.id,
            project_id: r.project_id,
            expected_status: r.status,
            new_status: ReleaseStatus::Latest,
            event: ReleaseEvent::standard(r.id, ReleaseStatus::Latest, Utc::now()),
            review: None,
            approved_at: None,
            demote_latest: true,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_version() {
        let store = MemoryReleaseStore::new();
        let project = ProjectId::new();
        store
            .insert_release(&release(project, "v. 1.0", ReleaseStatus::New))
            .await
            .unwrap();
        let err = store
            .insert_release(&release(project, "v. 1.0", ReleaseStatus::New))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateVersion);

        store
            .insert_release(&release(ProjectId::new(), "v. 1.0", ReleaseStatus::New))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transition_demotes_sibling_without_event() {
        let store = MemoryReleaseStore::new();
        let project = ProjectId::new();
        let old = release(project, "v. 1.1", ReleaseStatus::Latest);
        let new = release(project, "v. 1.0", ReleaseStatus::Approved);
        store.insert_release(&old).await.unwrap();
        store.insert_release(&new).await.unwrap();

        let demoted = store.apply_transition(&promote(&new)).await.unwrap();
        assert_eq!(demoted, vec![old.id]);

        let old = store.find_release(old.id).await.unwrap().unwrap();
        assert_eq!(old.status, ReleaseStatus::Finished);
        assert!(old.events.is_empty());
        let new = store.find_release(new.id).await.unwrap().unwrap();
        assert_eq!(new.status, ReleaseStatus::Latest);
        assert_eq!(new.events.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_expected_status_writes_nothing() {
        let store = MemoryReleaseStore::new();
        let r = release(ProjectId::new(), "v. 1.0", ReleaseStatus::New);
        store.insert_release(&r).await.unwrap();

        let mut commit = promote(&r);
        commit.expected_status = ReleaseStatus::Approved;
        let err = store.apply_transition(&commit).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::IllegalTransition);
        assert!(store.find_release(r.id).await.unwrap().unwrap().events.is_empty());
    }

    #[tokio::test]
    async fn test_review_closes_batch_once() {
        let store = MemoryReleaseStore::new();
        let r = release(ProjectId::new(), "v. 1.0", ReleaseStatus::New);
        store.insert_release(&r).await.unwrap();

        let upload = ReleaseEvent::asset_uploading(r.id, vec![], None, Utc::now());
        let upload_id = upload.id;
        store
            .apply_transition(&TransitionCommit {
                release_id: r.id,
                project_id: r.project_id,
                expected_status: ReleaseStatus::New,
                new_status: ReleaseStatus::Verifying,
                event: upload,
                review: None,
                approved_at: None,
                demote_latest: false,
            })
            .await
            .unwrap();

        let approve = TransitionCommit {
            release_id: r.id,
            project_id: r.project_id,
            expected_status: ReleaseStatus::Verifying,
            new_status: ReleaseStatus::Approved,
            event: ReleaseEvent::standard(r.id, ReleaseStatus::Approved, Utc::now()),
            review: Some(UploadReview {
                event_id: upload_id,
                comment: Some("fine".into()),
            }),
            approved_at: Some(Utc::now()),
            demote_latest: false,
        };
        store.apply_transition(&approve).await.unwrap();

        let stored = store.find_release(r.id).await.unwrap().unwrap();
        let batch = stored.find_upload(upload_id).unwrap();
        assert!(batch.commented);
        assert_eq!(batch.comment.as_deref(), Some("fine"));
        assert!(stored.approved_at.is_some());

        let mut again = approve.clone();
        again.expected_status = ReleaseStatus::Approved;
        let err = store.apply_transition(&again).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyCommented);
        assert_eq!(store.find_release(r.id).await.unwrap().unwrap().events.len(), 2);
    }
}
