//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        memberships::{
            data::{NewMembership, NewMembershipEvent},
            records::{MembershipEventKind, MembershipUuid},
            repository::PgMembershipsRepository,
            roles::{AssignableRole, MembershipRole},
        },
        tenants::{
            data::NewTenant,
            errors::TenantsServiceError,
            records::{ProvisionedTenant, TenantRecord, TenantUuid},
            repository::PgTenantsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    db: Db,
    repository: PgTenantsRepository,
    memberships: PgMembershipsRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgTenantsRepository::new(),
            memberships: PgMembershipsRepository::new(),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    #[tracing::instrument(
        name = "tenants.service.create_tenant",
        skip(self, tenant),
        fields(
            tenant_uuid = %tenant.uuid,
            owner_uuid = %tenant.owner,
            admin_uuid = %tenant.admin
        ),
        err
    )]
    async fn create_tenant(
        &self,
        tenant: NewTenant,
    ) -> Result<ProvisionedTenant, TenantsServiceError> {
        if tenant.owner == tenant.admin {
            return Err(TenantsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant.uuid).await?;

        let record = self
            .repository
            .create_tenant(&mut tx, tenant.uuid, tenant.name.trim())
            .await?;

        let owner = self
            .memberships
            .insert_owner_membership(&mut tx, tenant.uuid, MembershipUuid::new(), tenant.owner)
            .await?
            .ok_or(TenantsServiceError::InvalidData)?;

        let admin = self
            .memberships
            .insert_membership(
                &mut tx,
                tenant.uuid,
                &NewMembership {
                    uuid: MembershipUuid::new(),
                    user: tenant.admin,
                    role: MembershipRole::Admin,
                },
                AssignableRole::Admin,
            )
            .await?
            .ok_or(TenantsServiceError::InvalidData)?;

        for membership in [&owner, &admin] {
            self.memberships
                .record_event(
                    &mut tx,
                    NewMembershipEvent {
                        tenant: tenant.uuid,
                        membership: membership.uuid,
                        actor: tenant.owner,
                        kind: MembershipEventKind::Added,
                        previous_role: None,
                        role: membership.role,
                    },
                )
                .await?;
        }

        tx.commit().await?;

        info!(tenant_uuid = %record.uuid, "provisioned tenant");

        Ok(ProvisionedTenant {
            tenant: record,
            owner,
            admin,
        })
    }

    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self.repository.get_tenant(&mut tx, tenant).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Tenant persistence operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant with its owner and first admin memberships.
    async fn create_tenant(
        &self,
        tenant: NewTenant,
    ) -> Result<ProvisionedTenant, TenantsServiceError>;

    /// Retrieve a single tenant.
    async fn get_tenant(&self, tenant: TenantUuid) -> Result<TenantRecord, TenantsServiceError>;
}
