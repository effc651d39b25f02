//! Project repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use nova_core::error::{AppError, ErrorKind};
use nova_core::result::AppResult;
use nova_core::types::id::ProjectId;
use nova_entity::project::{Project, ProjectMember};

use crate::store::ProjectDirectory;

/// Repository for projects and their member lists.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectDirectory for ProjectRepository {
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, logo_url, author_id FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))?;

        let Some(mut project) = project else {
            return Ok(None);
        };

        project.members = sqlx::query_as::<_, ProjectMember>(
            "SELECT user_id, role FROM project_members WHERE project_id = $1 ORDER BY joined_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load project members", e)
        })?;

        Ok(Some(project))
    }

    async fn save_project(&self, project: &Project) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query(
            "INSERT INTO projects (id, name, logo_url, author_id) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET name = $2, logo_url = $3, author_id = $4",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.logo_url)
        .bind(project.author_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save project", e))?;

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(project.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to reset project members", e)
            })?;

        for member in &project.members {
            sqlx::query("INSERT INTO project_members (project_id, user_id, role) VALUES ($1, $2, $3)")
                .bind(project.id)
                .bind(member.user_id)
                .bind(member.role)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to add project member", e)
                })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit project", e)
        })
    }
}
