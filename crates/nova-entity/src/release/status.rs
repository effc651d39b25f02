//! Release status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a release.
///
/// The status is always derivable from the release's event log: the newest
/// event decides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "release_status")]
pub enum ReleaseStatus {
    /// Created, no assets uploaded yet.
    New,
    /// Assets uploaded, awaiting review.
    Verifying,
    /// The last upload was rejected by a reviewer.
    Rejected,
    /// The last upload was approved by a reviewer.
    Approved,
    /// Distributed as an alpha build.
    Alpha,
    /// Distributed as a beta build.
    Beta,
    /// The current release of the project. At most one per project.
    Latest,
    /// Superseded by a newer `Latest`.
    Finished,
}

impl ReleaseStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [ReleaseStatus; 8] = [
        Self::New,
        Self::Verifying,
        Self::Rejected,
        Self::Approved,
        Self::Alpha,
        Self::Beta,
        Self::Latest,
        Self::Finished,
    ];

    /// Hex color used to render the status badge.
    pub fn color(&self) -> &'static str {
        match self {
            Self::New => "#e88f13",
            Self::Verifying => "#B1AA2D",
            Self::Rejected => "#E24747",
            Self::Approved => "#86b49a",
            Self::Alpha => "#AF6BDC",
            Self::Beta => "#d073b8",
            Self::Latest => "#3A98C7",
            Self::Finished => "#d7e0da",
        }
    }

    /// Whether assets may be uploaded from this status.
    pub fn accepts_upload(&self) -> bool {
        matches!(self, Self::New | Self::Rejected)
    }

    /// Whether this is one of the distribution channels a release can be promoted to.
    pub fn is_distribution(&self) -> bool {
        matches!(self, Self::Alpha | Self::Beta | Self::Latest)
    }

    /// Return the status name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Verifying => "Verifying",
            Self::Rejected => "Rejected",
            Self::Approved => "Approved",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Latest => "Latest",
            Self::Finished => "Finished",
        }
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReleaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown release status '{s}'"))
    }
}
