//! Release lifecycle operations.

use std::sync::Arc;

use tracing::{info, warn};

use nova_core::config::{ReleaseConfig, StorageConfig};
use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{RejectedTagId, ReleaseId};
use nova_database::store::{ProjectDirectory, ReleaseStore, TransitionCommit, UploadReview};
use nova_entity::event::{AssetUploaded, ReleaseEvent};
use nova_entity::project::{Project, ProjectRole};
use nova_entity::release::{Release, ReleaseStatus};
use nova_storage::{AssetStore, ReportStore};

use super::request::{
    AddReleaseRequest, AnnotateTagRequest, ApproveAssetsRequest, EditReleaseRequest,
    RejectAssetsRequest, UploadAssetsRequest, UploadFile,
};
use super::transition::{ReleaseAction, check_annotation, next_status};
use crate::context::RequestContext;
use crate::lock::LockRegistry;
use crate::notification::NotificationFanout;
use crate::report::delete_version_reports;

/// Drives releases through their status lifecycle.
///
/// Every mutating call holds the release's lock for its whole
/// read-validate-write sequence; promotions hold the project lock first.
/// Stores re-check the planned-from status on commit, so a concurrent
/// writer in another process makes the loser fail without effect.
#[derive(Debug, Clone)]
pub struct ReleaseService {
    releases: Arc<dyn ReleaseStore>,
    projects: Arc<dyn ProjectDirectory>,
    assets: AssetStore,
    reports: ReportStore,
    fanout: NotificationFanout,
    locks: Arc<LockRegistry>,
    limits: ReleaseConfig,
    storage: StorageConfig,
}

impl ReleaseService {
    /// Creates a new release service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        releases: Arc<dyn ReleaseStore>,
        projects: Arc<dyn ProjectDirectory>,
        assets: AssetStore,
        reports: ReportStore,
        fanout: NotificationFanout,
        locks: Arc<LockRegistry>,
        limits: ReleaseConfig,
        storage: StorageConfig,
    ) -> Self {
        Self {
            releases,
            projects,
            assets,
            reports,
            fanout,
            locks,
            limits,
            storage,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Gets a release of the context's project with its full log.
    pub async fn get_release(&self, ctx: &RequestContext, release_id: ReleaseId) -> AppResult<Release> {
        self.load(ctx, release_id).await
    }

    /// Lists the project's releases, newest first.
    pub async fn list_releases(&self, ctx: &RequestContext) -> AppResult<Vec<Release>> {
        self.releases.list_project_releases(ctx.project_id).await
    }

    // ── Vendor side ─────────────────────────────────────────────────

    /// Creates a release in `New` status.
    pub async fn add_release(&self, ctx: &RequestContext, req: AddReleaseRequest) -> AppResult<Release> {
        ctx.require_vendor_side("add releases")?;
        let version = req.check(&self.limits)?;
        let project = self.project(ctx).await?;

        if self.releases.version_exists(project.id, &version, None).await? {
            return Err(AppError::duplicate_version(format!(
                "Version '{version}' already exists in project"
            )));
        }

        let release = Release::new(project.id, version, req.notes);
        self.releases.insert_release(&release).await?;

        info!(
            release_id = %release.id,
            project_id = %project.id,
            actor = %ctx.user_id,
            version = %release.version,
            "Release created"
        );
        self.fanout
            .status_changed(&project, &release, ReleaseStatus::New, ctx.user_id)
            .await;
        Ok(release)
    }

    /// Edits notes and, optionally, the version. Appends no event.
    pub async fn edit_release(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        req: EditReleaseRequest,
    ) -> AppResult<Release> {
        ctx.require_vendor_side("edit releases")?;
        let new_version = req.check(&self.limits)?;
        let _guard = self.locks.acquire(release_id).await;
        let release = self.load(ctx, release_id).await?;

        let version = new_version.unwrap_or_else(|| release.version.clone());
        let renamed = version != release.version;
        if renamed
            && self
                .releases
                .version_exists(release.project_id, &version, Some(release_id))
                .await?
        {
            return Err(AppError::duplicate_version(format!(
                "Version '{version}' already exists in project"
            )));
        }

        self.releases
            .update_details(release_id, &version, &req.notes)
            .await?;

        if renamed {
            let project = self.project(ctx).await?;
            if let Err(e) = delete_version_reports(&self.reports, &project, release_id, release.version_key()).await {
                warn!(%release_id, error = %e, "Failed to delete reports of the previous version");
            }
        }

        info!(%release_id, actor = %ctx.user_id, version = %version, "Release edited");
        self.load(ctx, release_id).await
    }

    /// Stores an asset batch and moves the release to `Verifying`.
    ///
    /// All files are checked before any is stored; a failure while storing
    /// or committing removes the files stored by this call.
    pub async fn upload_assets(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        req: UploadAssetsRequest,
    ) -> AppResult<Release> {
        ctx.require_vendor_side("upload assets")?;
        let comment = req.check(&self.limits)?;
        let _guard = self.locks.acquire(release_id).await;
        let project = self.project(ctx).await?;
        let release = self.load(ctx, release_id).await?;

        let new_status = next_status(&release, ReleaseAction::UploadAssets)?;
        self.check_files(&req.files)?;

        let mut stored: Vec<AssetUploaded> = Vec::with_capacity(req.files.len());
        for file in &req.files {
            match self
                .assets
                .store(release.id, &file.file_name, file.data.clone())
                .await
            {
                Ok(asset) => stored.push(asset),
                Err(e) => {
                    self.discard_assets(&stored).await;
                    return Err(e);
                }
            }
        }

        let event = ReleaseEvent::asset_uploading(
            release.id,
            stored.clone(),
            comment,
            release.next_event_at(),
        );
        let commit = TransitionCommit {
            release_id: release.id,
            project_id: release.project_id,
            expected_status: release.status,
            new_status,
            event,
            review: None,
            approved_at: None,
            demote_latest: false,
        };
        if let Err(e) = self.commit(ctx, &release, &commit).await {
            self.discard_assets(&stored).await;
            return Err(e);
        }
        self.announce(ctx, &project, release_id, new_status).await
    }

    /// Promotes a reviewed release to a distribution channel.
    ///
    /// Promoting to `Latest` demotes the project's current `Latest` release
    /// to `Finished` in the same commit, without an event on the sibling.
    pub async fn promote(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        target: ReleaseStatus,
    ) -> AppResult<Release> {
        ctx.require_vendor_side("promote releases")?;
        let _project_guard = self.locks.acquire(ctx.project_id).await;
        let _guard = self.locks.acquire(release_id).await;
        let project = self.project(ctx).await?;
        let release = self.load(ctx, release_id).await?;

        let new_status = next_status(&release, ReleaseAction::Promote(target))?;
        let commit = TransitionCommit {
            release_id: release.id,
            project_id: release.project_id,
            expected_status: release.status,
            new_status,
            event: ReleaseEvent::standard(release.id, new_status, release.next_event_at()),
            review: None,
            approved_at: None,
            demote_latest: new_status == ReleaseStatus::Latest,
        };
        self.commit(ctx, &release, &commit).await?;
        self.announce(ctx, &project, release_id, new_status).await
    }

    /// Deletes a release with its log, stored assets, and reports.
    pub async fn delete_release(&self, ctx: &RequestContext, release_id: ReleaseId) -> AppResult<()> {
        ctx.require_vendor_side("delete releases")?;
        let _guard = self.locks.acquire(release_id).await;
        let project = self.project(ctx).await?;
        let release = self.load(ctx, release_id).await?;

        self.remove(&project, &release).await?;
        info!(%release_id, project_id = %project.id, actor = %ctx.user_id, "Release deleted");
        self.fanout
            .release_deleted(&project, &release.version, ctx.user_id)
            .await;
        Ok(())
    }

    /// Deletes every release of the project. Only the project author may purge.
    ///
    /// Returns the number of releases deleted.
    pub async fn purge_project(&self, ctx: &RequestContext) -> AppResult<usize> {
        if ctx.role != ProjectRole::Author {
            return Err(AppError::authorization("Only the project author may purge it"));
        }
        let _project_guard = self.locks.acquire(ctx.project_id).await;
        let project = self.project(ctx).await?;

        let releases = self.releases.list_project_releases(project.id).await?;
        for release in &releases {
            let _guard = self.locks.acquire(release.id).await;
            self.remove(&project, release).await?;
        }

        info!(project_id = %project.id, actor = %ctx.user_id, releases = releases.len(), "Project purged");
        self.fanout.project_deleted(&project, ctx.user_id).await;
        Ok(releases.len())
    }

    // ── Review side ─────────────────────────────────────────────────

    /// Approves the open upload batch.
    pub async fn approve_assets(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        req: ApproveAssetsRequest,
    ) -> AppResult<Release> {
        ctx.require_reviewer("approve assets")?;
        let comment = req.check(&self.limits)?;
        let _guard = self.locks.acquire(release_id).await;
        let project = self.project(ctx).await?;
        let release = self.load(ctx, release_id).await?;

        let new_status = next_status(&release, ReleaseAction::ApproveAssets(req.event_id))?;
        let at = release.next_event_at();
        let commit = TransitionCommit {
            release_id: release.id,
            project_id: release.project_id,
            expected_status: release.status,
            new_status,
            event: ReleaseEvent::standard(release.id, new_status, at),
            review: Some(UploadReview {
                event_id: req.event_id,
                comment,
            }),
            approved_at: Some(at),
            demote_latest: false,
        };
        self.commit(ctx, &release, &commit).await?;
        self.announce(ctx, &project, release_id, new_status).await
    }

    /// Rejects the open upload batch with reasons and tags.
    pub async fn reject_assets(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        req: RejectAssetsRequest,
    ) -> AppResult<Release> {
        ctx.require_reviewer("reject assets")?;
        req.check(&self.limits)?;
        let _guard = self.locks.acquire(release_id).await;
        let project = self.project(ctx).await?;
        let release = self.load(ctx, release_id).await?;

        let new_status = next_status(&release, ReleaseAction::RejectAssets(req.event_id))?;
        let commit = TransitionCommit {
            release_id: release.id,
            project_id: release.project_id,
            expected_status: release.status,
            new_status,
            event: ReleaseEvent::rejected(
                release.id,
                req.reasons,
                &req.tags,
                release.next_event_at(),
            ),
            review: Some(UploadReview {
                event_id: req.event_id,
                comment: None,
            }),
            approved_at: None,
            demote_latest: false,
        };
        self.commit(ctx, &release, &commit).await?;
        self.announce(ctx, &project, release_id, new_status).await
    }

    /// Comments a tag of the release's current rejection.
    pub async fn annotate_rejected_tag(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        tag_id: RejectedTagId,
        req: AnnotateTagRequest,
    ) -> AppResult<Release> {
        ctx.require_reviewer("annotate rejected tags")?;
        req.check(&self.limits)?;
        let _guard = self.locks.acquire(release_id).await;
        let release = self.load(ctx, release_id).await?;

        check_annotation(&release, tag_id)?;
        self.releases
            .set_tag_comment(release_id, tag_id, req.comment.trim())
            .await?;

        info!(%release_id, %tag_id, actor = %ctx.user_id, "Rejected tag annotated");
        self.load(ctx, release_id).await
    }

    // ── Internals ───────────────────────────────────────────────────

    async fn project(&self, ctx: &RequestContext) -> AppResult<Project> {
        self.projects
            .find_project(ctx.project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {} not found", ctx.project_id)))
    }

    /// Loads a release, hiding releases of other projects.
    async fn load(&self, ctx: &RequestContext, release_id: ReleaseId) -> AppResult<Release> {
        self.releases
            .find_release(release_id)
            .await?
            .filter(|r| r.project_id == ctx.project_id)
            .ok_or_else(|| AppError::not_found(format!("Release {release_id} not found")))
    }

    fn check_files(&self, files: &[UploadFile]) -> AppResult<()> {
        if let Some(empty) = files.iter().find(|f| f.data.is_empty()) {
            return Err(AppError::empty_asset(format!(
                "Asset '{}' is empty",
                empty.file_name
            )));
        }
        for file in files {
            if file.file_name.trim().is_empty() {
                return Err(AppError::validation("Asset file name is required"));
            }
            if !self.storage.accepts_file_name(&file.file_name) {
                return Err(AppError::validation(format!(
                    "Asset '{}' has an unsupported extension",
                    file.file_name
                )));
            }
            if file.data.len() as u64 > self.storage.max_asset_size_bytes {
                return Err(AppError::validation(format!(
                    "Asset '{}' exceeds the maximum size of {} bytes",
                    file.file_name, self.storage.max_asset_size_bytes
                )));
            }
        }
        Ok(())
    }

    async fn discard_assets(&self, assets: &[AssetUploaded]) {
        for asset in assets {
            if let Err(e) = self.assets.delete(&asset.storage_path).await {
                warn!(asset_id = %asset.id, path = %asset.storage_path, error = %e, "Failed to discard stored asset");
            }
        }
    }

    async fn commit(
        &self,
        ctx: &RequestContext,
        release: &Release,
        commit: &TransitionCommit,
    ) -> AppResult<()> {
        let demoted = self.releases.apply_transition(commit).await?;
        info!(
            release_id = %release.id,
            project_id = %release.project_id,
            actor = %ctx.user_id,
            from = %commit.expected_status,
            to = %commit.new_status,
            "Release transition committed"
        );
        for sibling in demoted {
            info!(release_id = %sibling, project_id = %release.project_id, "Release demoted to Finished");
        }
        Ok(())
    }

    /// Reloads the committed release and notifies the other participants.
    async fn announce(
        &self,
        ctx: &RequestContext,
        project: &Project,
        release_id: ReleaseId,
        status: ReleaseStatus,
    ) -> AppResult<Release> {
        let release = self.load(ctx, release_id).await?;
        self.fanout
            .status_changed(project, &release, status, ctx.user_id)
            .await;
        Ok(release)
    }

    /// Deletes rows first, then the files they referenced.
    async fn remove(&self, project: &Project, release: &Release) -> AppResult<()> {
        self.releases.delete_release(release.id).await?;

        for asset in release.assets() {
            match self.assets.delete(&asset.storage_path).await {
                Ok(true) => {}
                Ok(false) => warn!(asset_id = %asset.id, path = %asset.storage_path, "Stored asset already missing"),
                Err(e) => warn!(asset_id = %asset.id, error = %e, "Failed to delete stored asset"),
            }
        }
        if let Err(e) = delete_version_reports(&self.reports, project, release.id, release.version_key()).await {
            warn!(release_id = %release.id, error = %e, "Failed to delete release reports");
        }
        Ok(())
    }
}
