//! Storage provider trait for pluggable byte storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StorageObjectMeta {
    /// Path within the storage provider.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Whether this is a directory.
    pub is_directory: bool,
}

/// Trait for byte storage backends holding release assets and reports.
///
/// Paths are relative, `/`-separated, and interpreted by the provider.
/// The trait is defined here in `nova-core` and implemented in
/// `nova-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file at the given path, replacing any previous content.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete a file. Returns `true` if a file was removed.
    async fn delete(&self, path: &str) -> AppResult<bool>;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a file or directory.
    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta>;

    /// List the contents of a directory. A missing directory lists as empty.
    async fn list(&self, path: &str) -> AppResult<Vec<StorageObjectMeta>>;
}
