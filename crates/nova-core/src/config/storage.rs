//! Asset and report storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Directory (relative to `data_root`) holding uploaded release assets.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    /// Directory (relative to `data_root`) holding rendered release reports.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
    /// Maximum size of a single uploaded asset in bytes (default 2 GB).
    #[serde(default = "default_max_asset_size")]
    pub max_asset_size_bytes: u64,
    /// Accepted asset file extensions; an empty list accepts everything.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_asset_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            assets_dir: default_assets_dir(),
            reports_dir: default_reports_dir(),
            max_asset_size_bytes: default_max_asset_size(),
            allowed_asset_extensions: default_allowed_extensions(),
        }
    }
}

impl StorageConfig {
    /// Check whether a file name carries an accepted extension.
    pub fn accepts_file_name(&self, file_name: &str) -> bool {
        if self.allowed_asset_extensions.is_empty() {
            return true;
        }
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.allowed_asset_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_max_asset_size() -> u64 {
    2_147_483_648 // 2 GB
}

fn default_allowed_extensions() -> Vec<String> {
    [
        "zip", "tgz", "7z", "jar", "apk", "aab", "ipa", "exe", "msi", "deb", "rpm", "pkg", "dmg",
        "appimage", "pdf", "txt", "md",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}
