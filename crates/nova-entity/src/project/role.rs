//! Project role definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a project member is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Builds and ships releases.
    Vendor,
    /// Receives and reviews releases.
    Customer,
    /// Reviews releases on the customer's behalf.
    Tester,
}

/// Effective role of a caller within one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Project owner. Acts on the vendor side.
    Author,
    Vendor,
    Customer,
    Tester,
}

impl ProjectRole {
    /// Whether the role may create, upload, promote, and delete releases.
    pub fn is_vendor_side(&self) -> bool {
        matches!(self, Self::Author | Self::Vendor)
    }

    /// Whether the role may approve and reject uploads.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Self::Customer | Self::Tester)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Vendor => "vendor",
            Self::Customer => "customer",
            Self::Tester => "tester",
        }
    }
}

impl From<MemberRole> for ProjectRole {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Vendor => Self::Vendor,
            MemberRole::Customer => Self::Customer,
            MemberRole::Tester => Self::Tester,
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
