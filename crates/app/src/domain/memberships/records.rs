//! Membership Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    domain::{
        memberships::roles::MembershipRole, tenants::records::TenantUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Membership UUID
pub type MembershipUuid = TypedUuid<MembershipRecord>;

/// Membership Record
///
/// A membership is never deleted. Removal clears `is_active` and a later add for
/// the same user reactivates the same row, keeping `uuid` stable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipRecord {
    pub uuid: MembershipUuid,
    pub tenant_uuid: TenantUuid,
    pub user_uuid: UserUuid,
    pub role: MembershipRole,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MembershipRecord {
    /// Whether this membership currently counts towards the tenant's admins.
    #[must_use]
    pub fn is_active_admin(&self) -> bool {
        self.is_active && self.role == MembershipRole::Admin
    }
}

/// Membership Event UUID
pub type MembershipEventUuid = TypedUuid<MembershipEventRecord>;

/// Kind of committed membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipEventKind {
    Added,
    Reactivated,
    RoleChanged,
    Removed,
}

impl MembershipEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Reactivated => "reactivated",
            Self::RoleChanged => "role_changed",
            Self::Removed => "removed",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "added" => Some(Self::Added),
            "reactivated" => Some(Self::Reactivated),
            "role_changed" => Some(Self::RoleChanged),
            "removed" => Some(Self::Removed),
            _ => None,
        }
    }
}

impl Display for MembershipEventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(self.as_str())
    }
}

/// Membership Event Record
///
/// One row per committed change, written in the same transaction as the change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipEventRecord {
    pub uuid: MembershipEventUuid,
    pub tenant_uuid: TenantUuid,
    pub membership_uuid: MembershipUuid,

    /// User who requested the change. Recorded only; never authorised here.
    pub actor_uuid: UserUuid,

    pub kind: MembershipEventKind,
    pub previous_role: Option<MembershipRole>,
    pub role: MembershipRole,
    pub created_at: Timestamp,
}
