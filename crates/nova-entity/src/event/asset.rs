//! Asset upload payloads.

use nova_core::types::id::AssetId;
use serde::{Deserialize, Serialize};

/// One stored file belonging to an upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUploaded {
    /// Unique asset identifier.
    pub id: AssetId,
    /// Storage-relative path of the stored file.
    pub storage_path: String,
    /// Original client file name.
    pub file_name: String,
    /// Size in bytes at upload time.
    pub size_bytes: i64,
}

/// Payload of an asset-uploading event: one batch of files under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUploading {
    /// Files in the batch, in upload order.
    pub assets: Vec<AssetUploaded>,
    /// Comment on the batch: the uploader's note, replaced by the reviewer's
    /// comment when one is given on approval.
    pub comment: Option<String>,
    /// Set once the batch has been approved or rejected. Never cleared.
    pub commented: bool,
}

impl AssetUploading {
    /// A fresh, unreviewed batch.
    pub fn new(assets: Vec<AssetUploaded>, comment: Option<String>) -> Self {
        Self {
            assets,
            comment,
            commented: false,
        }
    }

    /// Total size of the batch in bytes.
    pub fn total_size(&self) -> i64 {
        self.assets.iter().map(|a| a.size_bytes).sum()
    }
}
