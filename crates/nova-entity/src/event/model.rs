//! Release event model.

use chrono::{DateTime, Utc};
use nova_core::types::id::{ReleaseEventId, ReleaseId};
use serde::{Deserialize, Serialize};

use super::asset::{AssetUploaded, AssetUploading};
use super::tag::{RejectedTag, Rejection, ReleaseTag};
use crate::release::ReleaseStatus;

/// One entry in a release's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    /// Unique event identifier.
    pub id: ReleaseEventId,
    /// Release the event belongs to.
    pub release_id: ReleaseId,
    /// When the event happened.
    pub occurred_at: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(flatten)]
    pub kind: ReleaseEventKind,
}

/// The closed set of event variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReleaseEventKind {
    /// A plain status change (approval or promotion).
    Standard { status: ReleaseStatus },
    /// A batch of uploaded assets. Implies `Verifying`.
    AssetUploading(AssetUploading),
    /// A rejection of the preceding upload. Implies `Rejected`.
    Rejected(Rejection),
}

impl ReleaseEvent {
    fn with_kind(release_id: ReleaseId, kind: ReleaseEventKind, at: DateTime<Utc>) -> Self {
        Self {
            id: ReleaseEventId::new(),
            release_id,
            occurred_at: at,
            kind,
        }
    }

    /// A standard status event.
    pub fn standard(release_id: ReleaseId, status: ReleaseStatus, at: DateTime<Utc>) -> Self {
        Self::with_kind(release_id, ReleaseEventKind::Standard { status }, at)
    }

    /// An asset-uploading event for a fresh batch.
    pub fn asset_uploading(
        release_id: ReleaseId,
        assets: Vec<AssetUploaded>,
        comment: Option<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self::with_kind(
            release_id,
            ReleaseEventKind::AssetUploading(AssetUploading::new(assets, comment)),
            at,
        )
    }

    /// A rejected event with one fresh tag per category given.
    pub fn rejected(
        release_id: ReleaseId,
        reasons: String,
        tags: &[ReleaseTag],
        at: DateTime<Utc>,
    ) -> Self {
        let tags = tags.iter().copied().map(RejectedTag::new).collect();
        Self::with_kind(
            release_id,
            ReleaseEventKind::Rejected(Rejection { reasons, tags }),
            at,
        )
    }

    /// The status this event implies.
    pub fn status(&self) -> ReleaseStatus {
        match &self.kind {
            ReleaseEventKind::Standard { status } => *status,
            ReleaseEventKind::AssetUploading(_) => ReleaseStatus::Verifying,
            ReleaseEventKind::Rejected(_) => ReleaseStatus::Rejected,
        }
    }

    /// Stable discriminator used when persisting the event.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ReleaseEventKind::Standard { .. } => "standard",
            ReleaseEventKind::AssetUploading(_) => "asset_uploading",
            ReleaseEventKind::Rejected(_) => "rejected",
        }
    }

    /// Upload payload, if this is an asset-uploading event.
    pub fn as_upload(&self) -> Option<&AssetUploading> {
        match &self.kind {
            ReleaseEventKind::AssetUploading(upload) => Some(upload),
            _ => None,
        }
    }

    /// Mutable upload payload.
    pub fn as_upload_mut(&mut self) -> Option<&mut AssetUploading> {
        match &mut self.kind {
            ReleaseEventKind::AssetUploading(upload) => Some(upload),
            _ => None,
        }
    }

    /// Rejection payload, if this is a rejected event.
    pub fn as_rejection(&self) -> Option<&Rejection> {
        match &self.kind {
            ReleaseEventKind::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Mutable rejection payload.
    pub fn as_rejection_mut(&mut self) -> Option<&mut Rejection> {
        match &mut self.kind {
            ReleaseEventKind::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}
