//! Membership Roles

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::Serialize;
use thiserror::Error;

/// Role held by a membership.
///
/// Variants are declared in ascending privilege so the derived ordering can be
/// used for display. Invariant checks compare roles exactly and never rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Viewer,
    Staff,
    Admin,
    Owner,
}

impl MembershipRole {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Staff => "staff",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// The role as something a membership may be moved to, or `None` for the owner.
    #[must_use]
    pub const fn assignable(self) -> Option<AssignableRole> {
        match self {
            Self::Viewer => Some(AssignableRole::Viewer),
            Self::Staff => Some(AssignableRole::Staff),
            Self::Admin => Some(AssignableRole::Admin),
            Self::Owner => None,
        }
    }
}

impl Display for MembershipRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(self.as_str())
    }
}

/// Raised when a stored or user-supplied role string is not a known role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown membership role `{0}`")]
pub struct ParseMembershipRoleError(pub String);

impl FromStr for MembershipRole {
    type Err = ParseMembershipRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(ParseMembershipRoleError(value.to_string())),
        }
    }
}

/// Roles that can be written after tenant provisioning.
///
/// There is no owner variant. Repository inserts and role changes only accept
/// this type, so ownership cannot be handed out after provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignableRole {
    Viewer,
    Staff,
    Admin,
}

impl AssignableRole {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        MembershipRole::from_assignable(self).as_str()
    }
}

impl MembershipRole {
    const fn from_assignable(role: AssignableRole) -> Self {
        match role {
            AssignableRole::Viewer => Self::Viewer,
            AssignableRole::Staff => Self::Staff,
            AssignableRole::Admin => Self::Admin,
        }
    }
}

impl From<AssignableRole> for MembershipRole {
    fn from(role: AssignableRole) -> Self {
        Self::from_assignable(role)
    }
}
