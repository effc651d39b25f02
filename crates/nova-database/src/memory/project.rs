//! In-memory project directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use nova_core::result::AppResult;
use nova_core::types::id::ProjectId;
use nova_entity::project::Project;

use crate::store::ProjectDirectory;

/// Projects keyed by id.
#[derive(Debug, Default)]
pub struct MemoryProjectDirectory {
    projects: Mutex<HashMap<ProjectId, Project>>,
}

impl MemoryProjectDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectDirectory for MemoryProjectDirectory {
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>> {
        Ok(self.projects.lock().await.get(&id).cloned())
    }

    async fn save_project(&self, project: &Project) -> AppResult<()> {
        self.projects
            .lock()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }
}
