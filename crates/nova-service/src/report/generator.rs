//! Report generation with stale-file replacement.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{AssetId, ReleaseId};
use nova_database::store::{ProjectDirectory, ReleaseStore};
use nova_entity::project::Project;
use nova_entity::release::Release;
use nova_storage::{AssetStore, ReportStore};

use super::messages::messages_for;
use super::naming::{is_report_of, report_name, report_prefix};
use super::render::render_report;
use crate::context::RequestContext;

/// Where a generated report lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHandle {
    /// File name, derived from the release state.
    pub name: String,
    /// Storage path of the file.
    pub path: String,
    /// Whether this call rendered the file (false when reused).
    pub rendered: bool,
}

/// Renders and caches release reports.
#[derive(Debug, Clone)]
pub struct ReportService {
    releases: Arc<dyn ReleaseStore>,
    projects: Arc<dyn ProjectDirectory>,
    assets: AssetStore,
    reports: ReportStore,
    default_locale: String,
}

impl ReportService {
    /// Creates a new report service.
    pub fn new(
        releases: Arc<dyn ReleaseStore>,
        projects: Arc<dyn ProjectDirectory>,
        assets: AssetStore,
        reports: ReportStore,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            releases,
            projects,
            assets,
            reports,
            default_locale: default_locale.into(),
        }
    }

    /// Returns the report for the release's current state, rendering it if needed.
    ///
    /// Reports of the same version left over from an earlier state are
    /// deleted. Calling again without an intervening change returns the same
    /// handle without re-rendering.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        release_id: ReleaseId,
        locale: Option<&str>,
    ) -> AppResult<ReportHandle> {
        let release = self
            .releases
            .find_release(release_id)
            .await?
            .filter(|r| r.project_id == ctx.project_id)
            .ok_or_else(|| AppError::not_found(format!("Release {release_id} not found")))?;
        let project = self
            .projects
            .find_project(release.project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {} not found", release.project_id)))?;

        let name = report_name(&project.name, &release);
        let prefix = report_prefix(&project.name, release.version_key(), release.id);
        for existing in self.reports.list_names(project.id).await? {
            if existing != name && is_report_of(&existing, &prefix) {
                self.reports.delete(project.id, &existing).await?;
                debug!(%release_id, report = %existing, "Deleted stale report");
            }
        }

        let path = self.reports.path_of(project.id, &name);
        if self.reports.exists(project.id, &name).await? {
            return Ok(ReportHandle {
                name,
                path,
                rendered: false,
            });
        }

        let locale = locale.unwrap_or(self.default_locale.as_str());
        let sizes = self.measure_assets(&release).await;
        let html = render_report(&project, &release, &sizes, messages_for(locale));
        let path = self.reports.write(project.id, &name, html).await?;
        info!(
            %release_id,
            project_id = %project.id,
            status = %release.status,
            report = %name,
            locale,
            "Rendered release report"
        );

        Ok(ReportHandle {
            name,
            path,
            rendered: true,
        })
    }

    async fn measure_assets(&self, release: &Release) -> HashMap<AssetId, u64> {
        let sizes = join_all(release.assets().map(|asset| async move {
            (asset.id, self.assets.size_of(&asset.storage_path).await)
        }))
        .await;

        sizes
            .into_iter()
            .filter_map(|(id, size)| match size {
                Ok(size) => Some((id, size)),
                Err(e) => {
                    warn!(asset_id = %id, error = %e, "Asset size unavailable, using recorded size");
                    None
                }
            })
            .collect()
    }
}

/// Delete every stored report of one release version. Returns how many were removed.
pub async fn delete_version_reports(
    reports: &ReportStore,
    project: &Project,
    release_id: ReleaseId,
    version_key: &str,
) -> AppResult<usize> {
    let prefix = report_prefix(&project.name, version_key, release_id);
    let mut removed = 0;
    for name in reports.list_names(project.id).await? {
        if is_report_of(&name, &prefix) && reports.delete(project.id, &name).await? {
            removed += 1;
        }
    }
    Ok(removed)
}
