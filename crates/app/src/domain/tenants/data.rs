//! Tenant Data

use crate::domain::{tenants::records::TenantUuid, users::records::UserUuid};

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    /// UUID to assign to the tenant row.
    pub uuid: TenantUuid,

    /// Tenant name to persist.
    pub name: String,

    /// User who becomes the tenant's permanent owner.
    pub owner: UserUuid,

    /// User who becomes the tenant's first administrator.
    pub admin: UserUuid,
}
