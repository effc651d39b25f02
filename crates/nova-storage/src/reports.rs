//! Rendered report storage, one directory per project.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use nova_core::result::AppResult;
use nova_core::traits::storage::StorageProvider;
use nova_core::types::id::ProjectId;

/// Stores report documents under `{reports_dir}/{project_id}/`.
#[derive(Debug, Clone)]
pub struct ReportStore {
    provider: Arc<dyn StorageProvider>,
    dir: String,
}

impl ReportStore {
    /// Create a report store over `provider`, rooted at `dir`.
    pub fn new(provider: Arc<dyn StorageProvider>, dir: impl Into<String>) -> Self {
        Self {
            provider,
            dir: dir.into(),
        }
    }

    fn project_dir(&self, project_id: ProjectId) -> String {
        format!("{}/{project_id}", self.dir)
    }

    /// Storage path of a report.
    pub fn path_of(&self, project_id: ProjectId, name: &str) -> String {
        format!("{}/{name}", self.project_dir(project_id))
    }

    /// File names of every stored report of a project.
    pub async fn list_names(&self, project_id: ProjectId) -> AppResult<Vec<String>> {
        let entries = self.provider.list(&self.project_dir(project_id)).await?;
        Ok(entries
            .into_iter()
            .filter(|e| !e.is_directory)
            .filter_map(|e| e.path.rsplit('/').next().map(str::to_string))
            .collect())
    }

    /// Whether a report with this name exists.
    pub async fn exists(&self, project_id: ProjectId, name: &str) -> AppResult<bool> {
        self.provider.exists(&self.path_of(project_id, name)).await
    }

    /// Write a report and return its storage path.
    pub async fn write(&self, project_id: ProjectId, name: &str, content: String) -> AppResult<String> {
        let path = self.path_of(project_id, name);
        self.provider.write(&path, Bytes::from(content)).await?;
        debug!(%project_id, path, "Stored report");
        Ok(path)
    }

    /// Read a stored report.
    pub async fn read(&self, project_id: ProjectId, name: &str) -> AppResult<Bytes> {
        self.provider.read_bytes(&self.path_of(project_id, name)).await
    }

    /// Delete a report. Returns whether a file was removed.
    pub async fn delete(&self, project_id: ProjectId, name: &str) -> AppResult<bool> {
        self.provider.delete(&self.path_of(project_id, name)).await
    }
}
