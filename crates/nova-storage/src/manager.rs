//! Storage wiring from configuration.

use std::sync::Arc;

use tracing::info;

use nova_core::config::StorageConfig;
use nova_core::result::AppResult;
use nova_core::traits::storage::StorageProvider;

use crate::assets::AssetStore;
use crate::providers::LocalStorageProvider;
use crate::reports::ReportStore;

/// Asset and report stores sharing one provider.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn StorageProvider>,
    assets: AssetStore,
    reports: ReportStore,
}

impl StorageManager {
    /// Build the stores over an existing provider.
    pub fn new(provider: Arc<dyn StorageProvider>, config: &StorageConfig) -> Self {
        Self {
            assets: AssetStore::new(Arc::clone(&provider), config.assets_dir.clone()),
            reports: ReportStore::new(Arc::clone(&provider), config.reports_dir.clone()),
            provider,
        }
    }

    /// Build the stores over a local provider rooted at `data_root`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let provider = LocalStorageProvider::new(&config.data_root).await?;
        info!(root = %config.data_root, "Initialized local storage provider");
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Asset store.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Report store.
    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    /// Check the underlying provider.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.provider.health_check().await
    }
}
