//! Typed request payloads for release operations.
//!
//! `validator` enforces presence; the configurable length limits from
//! [`ReleaseConfig`] are applied by [`check_max_length`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use validator::Validate;

use nova_core::config::ReleaseConfig;
use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::ReleaseEventId;
use nova_entity::event::ReleaseTag;
use nova_entity::release::{normalize_version, version_key};

/// Fails with `Validation` when `value` is longer than `max` characters.
pub fn check_max_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} > {max} characters)"
        )));
    }
    Ok(())
}

/// Normalizes a raw version and checks its key against the limits.
pub fn normalized_version(raw: &str, limits: &ReleaseConfig) -> AppResult<String> {
    let version = normalize_version(raw);
    let key = version_key(&version);
    if key.is_empty() {
        return Err(AppError::validation("version is required"));
    }
    check_max_length("version", key, limits.max_version_length)?;
    Ok(version)
}

/// Fails with `Validation` when `value` is empty or only whitespace.
pub fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Trims a comment and drops it when nothing is left.
pub fn optional_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Payload for creating a release.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReleaseRequest {
    /// Release version, with or without the `v.` prefix.
    #[validate(length(min = 1, message = "is required"))]
    pub version: String,
    /// Release notes.
    #[validate(length(min = 1, message = "is required"))]
    pub notes: String,
}

impl AddReleaseRequest {
    /// Validates the payload and returns the normalized version.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<String> {
        self.validate()?;
        require_text("notes", &self.notes)?;
        check_max_length("notes", &self.notes, limits.max_notes_length)?;
        normalized_version(&self.version, limits)
    }
}

/// Payload for editing a release.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditReleaseRequest {
    /// New version; the current one is kept when absent.
    pub version: Option<String>,
    /// New release notes.
    #[validate(length(min = 1, message = "is required"))]
    pub notes: String,
}

impl EditReleaseRequest {
    /// Validates the payload and returns the normalized new version, if any.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<Option<String>> {
        self.validate()?;
        require_text("notes", &self.notes)?;
        check_max_length("notes", &self.notes, limits.max_notes_length)?;
        self.version
            .as_deref()
            .map(|v| normalized_version(v, limits))
            .transpose()
    }
}

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Client file name.
    pub file_name: String,
    /// File content.
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }
}

/// Payload for uploading an asset batch.
#[derive(Debug, Clone)]
pub struct UploadAssetsRequest {
    /// Files in upload order.
    pub files: Vec<UploadFile>,
    /// Uploader's note on the batch.
    pub comment: Option<String>,
}

impl UploadAssetsRequest {
    /// Validates the payload shape and returns the normalized comment.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<Option<String>> {
        if self.files.is_empty() {
            return Err(AppError::validation("files must contain at least one file"));
        }
        let comment = optional_comment(self.comment.as_deref());
        if let Some(comment) = &comment {
            check_max_length("comment", comment, limits.max_upload_comment_length)?;
        }
        Ok(comment)
    }
}

/// Payload for approving an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveAssetsRequest {
    /// The asset-uploading event being approved.
    pub event_id: ReleaseEventId,
    /// Reviewer comment replacing the uploader's note.
    pub comment: Option<String>,
}

impl ApproveAssetsRequest {
    /// Validates the payload and returns the normalized comment.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<Option<String>> {
        let comment = optional_comment(self.comment.as_deref());
        if let Some(comment) = &comment {
            check_max_length("comment", comment, limits.max_upload_comment_length)?;
        }
        Ok(comment)
    }
}

/// Payload for rejecting an upload batch.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RejectAssetsRequest {
    /// The asset-uploading event being rejected.
    pub event_id: ReleaseEventId,
    /// Why the batch was rejected.
    #[validate(length(min = 1, message = "are required"))]
    pub reasons: String,
    /// Categorized tags, possibly empty.
    #[serde(default)]
    pub tags: Vec<ReleaseTag>,
}

impl RejectAssetsRequest {
    /// Validates the payload.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<()> {
        self.validate()?;
        require_text("reasons", &self.reasons)?;
        check_max_length("reasons", &self.reasons, limits.max_reasons_length)
    }
}

/// Payload for annotating a rejected tag.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnnotateTagRequest {
    /// Vendor comment on the tag.
    #[validate(length(min = 1, message = "is required"))]
    pub comment: String,
}

impl AnnotateTagRequest {
    /// Validates the payload.
    pub fn check(&self, limits: &ReleaseConfig) -> AppResult<()> {
        self.validate()?;
        require_text("comment", &self.comment)?;
        check_max_length("comment", &self.comment, limits.max_tag_comment_length)
    }
}
