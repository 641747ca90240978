//! Membership Data

use crate::domain::{
    memberships::{
        records::{MembershipEventKind, MembershipUuid},
        roles::MembershipRole,
    },
    tenants::records::TenantUuid,
    users::records::UserUuid,
};

/// Identity of the user requesting a membership change.
pub type ActorUuid = UserUuid;

/// New Membership Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewMembership {
    /// UUID to assign when a fresh row is inserted. Ignored when an existing
    /// membership for the same user is reused.
    pub uuid: MembershipUuid,

    /// User joining the tenant.
    pub user: UserUuid,

    /// Requested role. The owner role is rejected.
    pub role: MembershipRole,
}

/// Audit event to append alongside a committed change.
#[derive(Debug, Clone)]
pub(crate) struct NewMembershipEvent {
    pub tenant: TenantUuid,
    pub membership: MembershipUuid,
    pub actor: ActorUuid,
    pub kind: MembershipEventKind,
    pub previous_role: Option<MembershipRole>,
    pub role: MembershipRole,
}
