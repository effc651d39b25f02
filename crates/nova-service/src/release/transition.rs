//! Release status transition rules.
//!
//! | From                    | Action          | To        |
//! |-------------------------|-----------------|-----------|
//! | New, Rejected           | upload assets   | Verifying |
//! | Verifying (uncommented) | approve assets  | Approved  |
//! | Verifying (uncommented) | reject assets   | Rejected  |
//! | Approved, Alpha, Beta, Latest | promote   | Alpha, Beta, Latest |
//!
//! Promotion order is not enforced between the distribution channels.
//! `Finished` is only reached by sibling demotion and has no action.

use nova_core::error::AppError;
use nova_core::result::AppResult;
use nova_core::types::id::{RejectedTagId, ReleaseEventId};
use nova_entity::release::{Release, ReleaseStatus};

/// A status-changing action requested on a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAction {
    UploadAssets,
    ApproveAssets(ReleaseEventId),
    RejectAssets(ReleaseEventId),
    Promote(ReleaseStatus),
}

impl ReleaseAction {
    /// Short verb used in error messages and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::UploadAssets => "upload assets",
            Self::ApproveAssets(_) => "approve assets",
            Self::RejectAssets(_) => "reject assets",
            Self::Promote(_) => "promote",
        }
    }
}

/// Decide the status `action` leads to from the release's current state.
///
/// Never mutates; a returned error means the action has no effect.
pub fn next_status(release: &Release, action: ReleaseAction) -> AppResult<ReleaseStatus> {
    match action {
        ReleaseAction::UploadAssets => {
            if release.status.accepts_upload() {
                Ok(ReleaseStatus::Verifying)
            } else {
                Err(illegal(release, action))
            }
        }
        ReleaseAction::ApproveAssets(event_id) => {
            check_reviewable(release, event_id, action)?;
            Ok(ReleaseStatus::Approved)
        }
        ReleaseAction::RejectAssets(event_id) => {
            check_reviewable(release, event_id, action)?;
            Ok(ReleaseStatus::Rejected)
        }
        ReleaseAction::Promote(target) => {
            if !target.is_distribution() {
                return Err(AppError::validation(format!(
                    "Cannot promote to {target}; expected Alpha, Beta or Latest"
                )));
            }
            match release.status {
                ReleaseStatus::Approved
                | ReleaseStatus::Alpha
                | ReleaseStatus::Beta
                | ReleaseStatus::Latest => Ok(target),
                _ => Err(illegal(release, action)),
            }
        }
    }
}

/// The upload batch must belong to the release, be open, and be under review.
fn check_reviewable(
    release: &Release,
    event_id: ReleaseEventId,
    action: ReleaseAction,
) -> AppResult<()> {
    let upload = release.find_upload(event_id).ok_or_else(|| {
        AppError::not_found(format!(
            "Upload event {event_id} not found in release {}",
            release.id
        ))
    })?;
    if upload.commented {
        return Err(AppError::already_commented(format!(
            "Upload event {event_id} has already been reviewed"
        )));
    }
    if release.status != ReleaseStatus::Verifying {
        return Err(illegal(release, action));
    }
    Ok(())
}

/// A rejected tag may be annotated only while its rejection is the latest event.
pub fn check_annotation(release: &Release, tag_id: RejectedTagId) -> AppResult<()> {
    let (event, _, _) = release
        .find_rejected_tag(tag_id)
        .ok_or_else(|| AppError::not_found(format!("Rejected tag {tag_id} not found")))?;
    if release.status != ReleaseStatus::Rejected || !release.is_last_event(event.id) {
        return Err(AppError::illegal_transition(format!(
            "Tag {tag_id} belongs to a superseded rejection"
        )));
    }
    Ok(())
}

fn illegal(release: &Release, action: ReleaseAction) -> AppError {
    AppError::illegal_transition(format!(
        "Cannot {} a release in status {}",
        action.verb(),
        release.status
    ))
}
