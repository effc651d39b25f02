//! Store bundle selected by `database.provider`.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use nova_core::config::{DatabaseConfig, DatabaseProvider};
use nova_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryNotificationStore, MemoryProjectDirectory, MemoryReleaseStore};
use crate::repositories::{NotificationRepository, ProjectRepository, ReleaseRepository};
use crate::store::{NotificationStore, ProjectDirectory, ReleaseStore};

/// The persistence ports used by the services.
#[derive(Debug, Clone)]
pub struct Stores {
    pub releases: Arc<dyn ReleaseStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub projects: Arc<dyn ProjectDirectory>,
    /// The pool backing the stores, when the provider is PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured provider.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                let mut stores = Self::postgres(db.pool().clone());
                stores.pool = Some(db);
                Ok(stores)
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory stores");
                Ok(Self::memory())
            }
        }
    }

    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            releases: Arc::new(ReleaseRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            projects: Arc::new(ProjectRepository::new(pool)),
            pool: None,
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        Self {
            releases: Arc::new(MemoryReleaseStore::new()),
            notifications: Arc::new(MemoryNotificationStore::new()),
            projects: Arc::new(MemoryProjectDirectory::new()),
            pool: None,
        }
    }
}
