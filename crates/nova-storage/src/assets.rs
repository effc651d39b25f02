//! Release asset storage.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::traits::storage::StorageProvider;
use nova_core::types::id::{AssetId, ReleaseId};
use nova_entity::event::AssetUploaded;

use crate::naming::sanitize_file_name;

/// Stores uploaded asset bytes under `{assets_dir}/{release_id}/`.
#[derive(Debug, Clone)]
pub struct AssetStore {
    provider: Arc<dyn StorageProvider>,
    dir: String,
}

impl AssetStore {
    /// Create an asset store over `provider`, rooted at `dir`.
    pub fn new(provider: Arc<dyn StorageProvider>, dir: impl Into<String>) -> Self {
        Self {
            provider,
            dir: dir.into(),
        }
    }

    /// Store one file and return its reference.
    pub async fn store(
        &self,
        release_id: ReleaseId,
        file_name: &str,
        data: Bytes,
    ) -> AppResult<AssetUploaded> {
        if data.is_empty() {
            return Err(AppError::empty_asset(format!("Asset '{file_name}' is empty")));
        }
        let id = AssetId::new();
        let path = format!(
            "{}/{release_id}/{id}_{}",
            self.dir,
            sanitize_file_name(file_name)
        );
        let size_bytes = data.len() as i64;
        self.provider.write(&path, data).await?;
        debug!(%release_id, %id, path, size_bytes, "Stored asset");

        Ok(AssetUploaded {
            id,
            storage_path: path,
            file_name: file_name.to_string(),
            size_bytes,
        })
    }

    /// Delete a stored asset. Returns whether a file was removed.
    pub async fn delete(&self, reference: &str) -> AppResult<bool> {
        self.provider.delete(reference).await
    }

    /// Current size of a stored asset in bytes.
    pub async fn size_of(&self, reference: &str) -> AppResult<u64> {
        Ok(self.provider.metadata(reference).await?.size_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::LocalStorageProvider;
    use nova_core::error::ErrorKind;

    #[tokio::test]
    async fn test_store_size_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let store = AssetStore::new(provider, "assets");
        let release_id = ReleaseId::new();

        let asset = store
            .store(release_id, "build 1.apk", Bytes::from_static(b"0123456789"))
            .await
            .unwrap();
        assert!(asset.storage_path.starts_with(&format!("assets/{release_id}/")));
        assert!(asset.storage_path.ends_with("_build_1.apk"));
        assert_eq!(asset.file_name, "build 1.apk");
        assert_eq!(store.size_of(&asset.storage_path).await.unwrap(), 10);

        assert!(store.delete(&asset.storage_path).await.unwrap());
        assert!(!store.delete(&asset.storage_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap());
        let store = AssetStore::new(provider, "assets");

        let err = store
            .store(ReleaseId::new(), "empty.zip", Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyAsset);
    }
}
