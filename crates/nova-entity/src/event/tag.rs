//! Rejection payloads and tag categories.

use nova_core::types::id::RejectedTagId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category attached to a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "release_tag")]
pub enum ReleaseTag {
    Bug,
    Issue,
    LayoutChange,
    Tip,
}

impl ReleaseTag {
    /// All tag categories.
    pub const ALL: [ReleaseTag; 4] = [Self::Bug, Self::Issue, Self::LayoutChange, Self::Tip];

    /// Hex color used to render the tag.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Bug => "#E24747",
            Self::Issue => "#AF6BDC",
            Self::LayoutChange => "#3A98C7",
            Self::Tip => "#1A50B5",
        }
    }

    /// Return the tag name as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Issue => "Issue",
            Self::LayoutChange => "LayoutChange",
            Self::Tip => "Tip",
        }
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReleaseTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '_' && *c != '-').collect();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown release tag '{s}'"))
    }
}

/// A categorized tag attached to a rejection, optionally annotated later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedTag {
    /// Unique tag identifier.
    pub id: RejectedTagId,
    /// Tag category.
    pub tag: ReleaseTag,
    /// Vendor annotation.
    pub comment: Option<String>,
}

impl RejectedTag {
    /// A fresh, unannotated tag.
    pub fn new(tag: ReleaseTag) -> Self {
        Self {
            id: RejectedTagId::new(),
            tag,
            comment: None,
        }
    }
}

/// Payload of a rejected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Free-text rejection reasons.
    pub reasons: String,
    /// Categorized tags, possibly empty.
    pub tags: Vec<RejectedTag>,
}
