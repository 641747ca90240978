//! Memberships service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Level, Span, debug, info};

use crate::{
    database::Db,
    domain::{
        memberships::{
            data::{ActorUuid, NewMembership, NewMembershipEvent},
            errors::MembershipsServiceError,
            records::{
                MembershipEventKind, MembershipEventRecord, MembershipRecord, MembershipUuid,
            },
            repository::PgMembershipsRepository,
            roles::MembershipRole,
            rules::{Change, check_change},
        },
        tenants::records::TenantUuid,
    },
};

/// How many times a membership is re-read when it changes between read and lock.
const MAX_LOCK_ATTEMPTS: usize = 3;

/// A membership locked for the rest of the transaction.
#[derive(Debug)]
struct LockedMembership {
    record: MembershipRecord,

    /// Active admins other than `record`, counted under the admin-set lock.
    /// Only present when the membership was an active admin when locked.
    other_admins: Option<u64>,
}

impl LockedMembership {
    fn check(&self, change: Change) -> Result<(), MembershipsServiceError> {
        check_change(self.record.role, change, self.other_admins.unwrap_or(0))
    }
}

#[derive(Debug, Clone)]
pub struct PgMembershipsService {
    db: Db,
    repository: PgMembershipsRepository,
}

impl PgMembershipsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgMembershipsRepository::new(),
        }
    }

    /// Lock `membership` so an invariant decision can be made against it.
    ///
    /// Locks are always taken as "tenant admin set, then one non-admin row". An
    /// active admin gets the whole admin set locked first and is then re-read. Any
    /// other membership is locked only if it still looks the way it was read; if it
    /// changed in between (for example it was just promoted to admin) the read is
    /// repeated.
    async fn lock_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Option<LockedMembership>, MembershipsServiceError> {
        for attempt in 1..=MAX_LOCK_ATTEMPTS {
            let Some(observed) = self
                .repository
                .find_membership(tx, tenant, membership)
                .await?
            else {
                return Ok(None);
            };

            if observed.is_active_admin() {
                let other_admins = self
                    .repository
                    .count_other_active_admins(tx, tenant, membership)
                    .await?;

                let record = self
                    .repository
                    .lock_membership(tx, tenant, membership)
                    .await?;

                return Ok(record.map(|record| LockedMembership {
                    record,
                    other_admins: Some(other_admins),
                }));
            }

            if let Some(record) = self
                .repository
                .lock_membership_if_unchanged(
                    tx,
                    tenant,
                    membership,
                    observed.role,
                    observed.is_active,
                )
                .await?
            {
                return Ok(Some(LockedMembership {
                    record,
                    other_admins: None,
                }));
            }

            debug!(attempt, "membership changed before it could be locked");
        }

        Err(MembershipsServiceError::Contended)
    }

    /// Move an active, locked membership to `role`, recording the change.
    async fn change_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        locked: LockedMembership,
        role: MembershipRole,
        actor: ActorUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        locked.check(Change::Assign(role))?;

        let current = locked.record;

        if current.role == role {
            return Ok(current);
        }

        let next = role
            .assignable()
            .ok_or(MembershipsServiceError::OwnerProtected)?;

        let updated = self
            .repository
            .update_membership_role(tx, current.tenant_uuid, current.uuid, next)
            .await?;

        self.repository
            .record_event(
                tx,
                NewMembershipEvent {
                    tenant: updated.tenant_uuid,
                    membership: updated.uuid,
                    actor,
                    kind: MembershipEventKind::RoleChanged,
                    previous_role: Some(current.role),
                    role: updated.role,
                },
            )
            .await?;

        Ok(updated)
    }
}

#[async_trait]
impl MembershipsService for PgMembershipsService {
    #[tracing::instrument(
        name = "memberships.service.add_user_to_tenant",
        skip(self, membership),
        fields(
            tenant_uuid = %tenant,
            user_uuid = %membership.user,
            role = %membership.role,
            actor_uuid = %actor,
            membership_uuid = tracing::field::Empty,
            outcome = tracing::field::Empty
        ),
        err(level = Level::WARN)
    )]
    async fn add_user_to_tenant(
        &self,
        tenant: TenantUuid,
        membership: NewMembership,
        actor: ActorUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let requested = membership
            .role
            .assignable()
            .ok_or(MembershipsServiceError::InvalidRoleAssignment)?;

        let span = Span::current();

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let existing = match self
            .repository
            .find_membership_for_user(&mut tx, tenant, membership.user)
            .await?
        {
            Some(existing) => existing.uuid,
            None => {
                let inserted = self
                    .repository
                    .insert_membership(&mut tx, tenant, &membership, requested)
                    .await?;

                if let Some(created) = inserted {
                    self.repository
                        .record_event(
                            &mut tx,
                            NewMembershipEvent {
                                tenant,
                                membership: created.uuid,
                                actor,
                                kind: MembershipEventKind::Added,
                                previous_role: None,
                                role: created.role,
                            },
                        )
                        .await?;

                    tx.commit().await?;

                    span.record("membership_uuid", tracing::field::display(created.uuid));
                    span.record("outcome", "added");

                    info!(membership_uuid = %created.uuid, "added user to tenant");

                    return Ok(created);
                }

                // A concurrent request for the same user committed first.
                self.repository
                    .find_membership_for_user(&mut tx, tenant, membership.user)
                    .await?
                    .ok_or(MembershipsServiceError::NotFound)?
                    .uuid
            }
        };

        span.record("membership_uuid", tracing::field::display(existing));

        let locked = self
            .lock_membership(&mut tx, tenant, existing)
            .await?
            .ok_or(MembershipsServiceError::NotFound)?;

        if !locked.record.is_active {
            let previous_role = locked.record.role;

            let reactivated = self
                .repository
                .reactivate_membership(&mut tx, tenant, existing, requested)
                .await?;

            self.repository
                .record_event(
                    &mut tx,
                    NewMembershipEvent {
                        tenant,
                        membership: reactivated.uuid,
                        actor,
                        kind: MembershipEventKind::Reactivated,
                        previous_role: Some(previous_role),
                        role: reactivated.role,
                    },
                )
                .await?;

            tx.commit().await?;

            span.record("outcome", "reactivated");

            info!(membership_uuid = %reactivated.uuid, "reactivated membership");

            return Ok(reactivated);
        }

        let previous_role = locked.record.role;

        let updated = self
            .change_role(&mut tx, locked, membership.role, actor)
            .await?;

        tx.commit().await?;

        if updated.role == previous_role {
            span.record("outcome", "unchanged");
        } else {
            span.record("outcome", "role_changed");

            info!(
                membership_uuid = %updated.uuid,
                previous_role = %previous_role,
                "changed role of existing member"
            );
        }

        Ok(updated)
    }

    #[tracing::instrument(
        name = "memberships.service.remove_user_from_tenant",
        skip(self),
        fields(
            tenant_uuid = %tenant,
            membership_uuid = %membership,
            actor_uuid = %actor,
            role = tracing::field::Empty,
            other_admins = tracing::field::Empty
        ),
        err(level = Level::WARN)
    )]
    async fn remove_user_from_tenant(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
        actor: ActorUuid,
    ) -> Result<(), MembershipsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let locked = self
            .lock_membership(&mut tx, tenant, membership)
            .await?
            .ok_or(MembershipsServiceError::NotFound)?;

        let span = Span::current();

        span.record("role", tracing::field::display(locked.record.role));

        if let Some(other_admins) = locked.other_admins {
            span.record("other_admins", other_admins);
        }

        if !locked.record.is_active {
            debug!("membership already inactive");

            return Ok(());
        }

        locked.check(Change::Deactivate)?;

        let removed = self
            .repository
            .deactivate_membership(&mut tx, tenant, membership)
            .await?;

        self.repository
            .record_event(
                &mut tx,
                NewMembershipEvent {
                    tenant,
                    membership,
                    actor,
                    kind: MembershipEventKind::Removed,
                    previous_role: Some(locked.record.role),
                    role: removed.role,
                },
            )
            .await?;

        tx.commit().await?;

        info!("removed user from tenant");

        Ok(())
    }

    #[tracing::instrument(
        name = "memberships.service.update_user_role",
        skip(self),
        fields(
            tenant_uuid = %tenant,
            membership_uuid = %membership,
            role = %role,
            actor_uuid = %actor,
            previous_role = tracing::field::Empty,
            other_admins = tracing::field::Empty
        ),
        err(level = Level::WARN)
    )]
    async fn update_user_role(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
        role: MembershipRole,
        actor: ActorUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let locked = self
            .lock_membership(&mut tx, tenant, membership)
            .await?
            .filter(|locked| locked.record.is_active)
            .ok_or(MembershipsServiceError::NotFound)?;

        let span = Span::current();

        span.record("previous_role", tracing::field::display(locked.record.role));

        if let Some(other_admins) = locked.other_admins {
            span.record("other_admins", other_admins);
        }

        let previous_role = locked.record.role;

        let updated = self.change_role(&mut tx, locked, role, actor).await?;

        tx.commit().await?;

        if updated.role != previous_role {
            info!("updated member role");
        }

        Ok(updated)
    }

    async fn get_membership(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .repository
            .find_membership(&mut tx, tenant, membership)
            .await?
            .ok_or(MembershipsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_memberships(
        &self,
        tenant: TenantUuid,
        include_inactive: bool,
    ) -> Result<Vec<MembershipRecord>, MembershipsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let memberships = self
            .repository
            .list_memberships(&mut tx, tenant, include_inactive)
            .await?;

        tx.commit().await?;

        Ok(memberships)
    }

    async fn list_membership_events(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Vec<MembershipEventRecord>, MembershipsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let events = self
            .repository
            .list_events(&mut tx, tenant, membership)
            .await?;

        tx.commit().await?;

        Ok(events)
    }
}

#[automock]
#[async_trait]
/// Tenant membership operations.
///
/// Every mutating operation runs in one transaction and either commits its whole
/// effect or leaves stored state untouched.
pub trait MembershipsService: Send + Sync {
    /// Adds a user to a tenant, reactivating their previous membership if one exists.
    ///
    /// When the user is already an active member this behaves like
    /// [`MembershipsService::update_user_role`], including its owner and
    /// last-admin protections.
    async fn add_user_to_tenant(
        &self,
        tenant: TenantUuid,
        membership: NewMembership,
        actor: ActorUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Deactivates a membership. Removing an inactive membership is a no-op.
    async fn remove_user_from_tenant(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
        actor: ActorUuid,
    ) -> Result<(), MembershipsServiceError>;

    /// Changes the role of an active membership.
    async fn update_user_role(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
        role: MembershipRole,
        actor: ActorUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Retrieve a single membership, active or not.
    async fn get_membership(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, MembershipsServiceError>;

    /// Lists a tenant's memberships, oldest first. Reads take no locks.
    async fn list_memberships(
        &self,
        tenant: TenantUuid,
        include_inactive: bool,
    ) -> Result<Vec<MembershipRecord>, MembershipsServiceError>;

    /// Lists the committed changes to a membership, oldest first.
    async fn list_membership_events(
        &self,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Vec<MembershipEventRecord>, MembershipsServiceError>;
}
