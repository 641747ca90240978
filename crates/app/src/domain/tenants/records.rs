//! Tenant Records

use jiff::Timestamp;
use serde::Serialize;

use crate::{domain::memberships::records::MembershipRecord, uuids::TypedUuid};

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
#[derive(Debug, Clone, Serialize)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable tenant name.
    pub name: String,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}

/// A tenant together with the memberships created when it was provisioned.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedTenant {
    pub tenant: TenantRecord,

    /// The tenant's permanent owner.
    pub owner: MembershipRecord,

    /// The tenant's first administrator.
    pub admin: MembershipRecord,
}
