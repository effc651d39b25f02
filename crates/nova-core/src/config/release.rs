//! Release payload limits.

use serde::{Deserialize, Serialize};

/// Length bounds applied to release payload fields before any mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Maximum length of a version key (the version without its `"v. "` prefix).
    #[serde(default = "default_max_version")]
    pub max_version_length: usize,
    /// Maximum length of the release notes.
    #[serde(default = "default_max_text")]
    pub max_notes_length: usize,
    /// Maximum length of rejection reasons.
    #[serde(default = "default_max_text")]
    pub max_reasons_length: usize,
    /// Maximum length of a comment on a rejection tag.
    #[serde(default = "default_max_comment")]
    pub max_tag_comment_length: usize,
    /// Maximum length of the comment attached to an upload batch.
    #[serde(default = "default_max_comment")]
    pub max_upload_comment_length: usize,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            max_version_length: default_max_version(),
            max_notes_length: default_max_text(),
            max_reasons_length: default_max_text(),
            max_tag_comment_length: default_max_comment(),
            max_upload_comment_length: default_max_comment(),
        }
    }
}

fn default_max_version() -> usize {
    15
}

fn default_max_text() -> usize {
    30_000
}

fn default_max_comment() -> usize {
    1_500
}
