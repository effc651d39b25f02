//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use nova_core::error::{AppError, ErrorKind};
use nova_core::result::AppResult;
use nova_core::traits::storage::{StorageObjectMeta, StorageProvider};

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root: impl AsRef<Path>) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let clean = Path::new(path.trim_start_matches('/'));
        if clean
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::validation(format!(
                "Storage path escapes the root: {path}"
            )));
        }
        Ok(self.root.join(clean))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn not_found_or_storage(path: &str, action: &str, e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("File not found: {path}"))
    } else {
        AppError::with_source(ErrorKind::Storage, format!("Failed to {action}: {path}"), e)
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path)
            .await
            .map_err(|e| not_found_or_storage(path, "read file", e))?;
        Ok(Bytes::from(data))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to inspect path: {path}"),
                e,
            )
        })
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let full_path = self.resolve(path)?;
        let meta = fs::metadata(&full_path)
            .await
            .map_err(|e| not_found_or_storage(path, "get metadata", e))?;

        Ok(StorageObjectMeta {
            path: path.to_string(),
            size_bytes: meta.len(),
            last_modified: meta.modified().ok().map(chrono::DateTime::<chrono::Utc>::from),
            is_directory: meta.is_dir(),
        })
    }

    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let full_path = self.resolve(path)?;
        if !full_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {path}"),
                e,
            )
        })?;

        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if path.is_empty() || path == "/" {
                name
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            };

            entries.push(StorageObjectMeta {
                path: entry_path,
                size_bytes: entry_meta.len(),
                last_modified: entry_meta
                    .modified()
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from),
                is_directory: entry_meta.is_dir(),
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
