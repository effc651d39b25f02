//! Release entity model.

use chrono::{DateTime, Utc};
use nova_core::types::id::{AssetId, ProjectId, RejectedTagId, ReleaseEventId, ReleaseId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::ReleaseStatus;
use super::version::version_key;
use crate::event::{AssetUploaded, AssetUploading, RejectedTag, Rejection, ReleaseEvent};

/// A versioned deliverable of a project together with its event log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Release {
    /// Unique release identifier.
    pub id: ReleaseId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display version, always `"v. <number>"`.
    pub version: String,
    /// Current lifecycle status.
    pub status: ReleaseStatus,
    /// Free-form release notes.
    pub notes: String,
    /// When the release was created.
    pub created_at: DateTime<Utc>,
    /// When the most recent upload batch was approved.
    pub approved_at: Option<DateTime<Utc>>,
    /// Event log, oldest first. Loaded separately from the row.
    #[sqlx(skip)]
    #[serde(default)]
    pub events: Vec<ReleaseEvent>,
}

impl Release {
    /// Create a new release in `New` status with an empty log.
    pub fn new(project_id: ProjectId, version: String, notes: String) -> Self {
        Self {
            id: ReleaseId::new(),
            project_id,
            version,
            status: ReleaseStatus::New,
            notes,
            created_at: Utc::now(),
            approved_at: None,
            events: Vec::new(),
        }
    }

    /// Version without the display prefix.
    pub fn version_key(&self) -> &str {
        version_key(&self.version)
    }

    /// Find an event of this release by id.
    pub fn find_event(&self, event_id: ReleaseEventId) -> Option<&ReleaseEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Find an asset-uploading event of this release by id.
    pub fn find_upload(&self, event_id: ReleaseEventId) -> Option<&AssetUploading> {
        self.find_event(event_id).and_then(ReleaseEvent::as_upload)
    }

    /// The newest event, if any.
    pub fn last_event(&self) -> Option<&ReleaseEvent> {
        self.events.last()
    }

    /// Whether `event_id` is the newest event of the log.
    pub fn is_last_event(&self, event_id: ReleaseEventId) -> bool {
        self.last_event().is_some_and(|e| e.id == event_id)
    }

    /// Time of the newest event.
    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.last_event().map(|e| e.occurred_at)
    }

    /// Millisecond timestamp of the newest event, `0` for an empty log.
    pub fn last_event_millis(&self) -> i64 {
        self.last_event_at()
            .map(|at| at.timestamp_millis())
            .unwrap_or(0)
    }

    /// Timestamp to stamp on the next appended event.
    ///
    /// Never earlier than the current newest event, so the log stays ordered
    /// even when the clock goes backwards.
    pub fn next_event_at(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.last_event_at() {
            Some(last) if last > now => last,
            _ => now,
        }
    }

    /// Find a rejected tag anywhere in the log, with the event that holds it.
    pub fn find_rejected_tag(
        &self,
        tag_id: RejectedTagId,
    ) -> Option<(&ReleaseEvent, &Rejection, &RejectedTag)> {
        self.events.iter().find_map(|event| {
            let rejection = event.as_rejection()?;
            rejection
                .tags
                .iter()
                .find(|t| t.id == tag_id)
                .map(|tag| (event, rejection, tag))
        })
    }

    /// Every asset stored for this release, across all uploads.
    pub fn assets(&self) -> impl Iterator<Item = &AssetUploaded> {
        self.events
            .iter()
            .filter_map(ReleaseEvent::as_upload)
            .flat_map(|upload| upload.assets.iter())
    }

    /// Find a stored asset by id.
    pub fn find_asset(&self, asset_id: AssetId) -> Option<&AssetUploaded> {
        self.assets().find(|a| a.id == asset_id)
    }
}
