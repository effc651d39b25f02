//! Service wiring from configuration.

use std::sync::Arc;

use tracing::info;

use nova_core::config::AppConfig;
use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{ProjectId, UserId};
use nova_database::{DatabasePool, Stores};
use nova_service::{
    LockRegistry, NotificationFanout, NotificationService, ReleaseService, ReportService,
    RequestContext,
};
use nova_storage::StorageManager;

/// Fully wired services for one CLI invocation.
#[derive(Debug, Clone)]
pub struct App {
    pub stores: Stores,
    pub storage: StorageManager,
    pub releases: ReleaseService,
    pub reports: ReportService,
    pub notifications: NotificationService,
}

impl App {
    /// Connect the configured stores and storage and build the services.
    pub async fn build(config: &AppConfig) -> AppResult<Self> {
        let stores = Stores::connect(&config.database).await?;
        let storage = StorageManager::from_config(&config.storage).await?;
        Ok(Self::from_parts(config, stores, storage))
    }

    /// Build the services over existing stores and storage.
    pub fn from_parts(config: &AppConfig, stores: Stores, storage: StorageManager) -> Self {
        let releases = ReleaseService::new(
            Arc::clone(&stores.releases),
            Arc::clone(&stores.projects),
            storage.assets().clone(),
            storage.reports().clone(),
            NotificationFanout::new(Arc::clone(&stores.notifications)),
            Arc::new(LockRegistry::new()),
            config.release.clone(),
            config.storage.clone(),
        );
        let reports = ReportService::new(
            Arc::clone(&stores.releases),
            Arc::clone(&stores.projects),
            storage.assets().clone(),
            storage.reports().clone(),
            config.report.default_locale.clone(),
        );
        let notifications = NotificationService::new(Arc::clone(&stores.notifications));
        info!("Services initialized");

        Self {
            stores,
            storage,
            releases,
            reports,
            notifications,
        }
    }

    /// Resolve the caller's role in a project.
    pub async fn context(&self, user_id: UserId, project_id: ProjectId) -> AppResult<RequestContext> {
        RequestContext::resolve(self.stores.projects.as_ref(), user_id, project_id).await
    }

    /// The PostgreSQL pool, for commands that need one.
    pub fn pool(&self) -> AppResult<&DatabasePool> {
        self.stores.pool.as_ref().ok_or_else(|| {
            AppError::configuration("This command requires the postgres database provider")
        })
    }
}
