//! Memberships Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    memberships::{
        data::{NewMembership, NewMembershipEvent},
        records::{
            MembershipEventKind, MembershipEventRecord, MembershipEventUuid, MembershipRecord,
            MembershipUuid,
        },
        roles::{AssignableRole, MembershipRole},
    },
    tenants::records::TenantUuid,
    users::records::UserUuid,
};

const FIND_MEMBERSHIP_SQL: &str = include_str!("sql/find_membership.sql");
const FIND_MEMBERSHIP_FOR_USER_SQL: &str = include_str!("sql/find_membership_for_user.sql");
const LOCK_MEMBERSHIP_SQL: &str = include_str!("sql/lock_membership.sql");
const LOCK_MEMBERSHIP_IF_UNCHANGED_SQL: &str =
    include_str!("sql/lock_membership_if_unchanged.sql");
const LOCK_ACTIVE_ADMINS_SQL: &str = include_str!("sql/lock_active_admins.sql");
const INSERT_MEMBERSHIP_SQL: &str = include_str!("sql/insert_membership.sql");
const REACTIVATE_MEMBERSHIP_SQL: &str = include_str!("sql/reactivate_membership.sql");
const UPDATE_MEMBERSHIP_ROLE_SQL: &str = include_str!("sql/update_membership_role.sql");
const DEACTIVATE_MEMBERSHIP_SQL: &str = include_str!("sql/deactivate_membership.sql");
const LIST_MEMBERSHIPS_SQL: &str = include_str!("sql/list_memberships.sql");
const INSERT_MEMBERSHIP_EVENT_SQL: &str = include_str!("sql/insert_membership_event.sql");
const LIST_MEMBERSHIP_EVENTS_SQL: &str = include_str!("sql/list_membership_events.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMembershipsRepository;

impl PgMembershipsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Unlocked read of a membership within the tenant.
    pub(crate) async fn find_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(FIND_MEMBERSHIP_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Unlocked read of the user's membership in the tenant, active or not.
    pub(crate) async fn find_membership_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        user: UserUuid,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(FIND_MEMBERSHIP_FOR_USER_SQL)
            .bind(tenant.into_uuid())
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Read a membership and hold its row lock until the transaction ends.
    pub(crate) async fn lock_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(LOCK_MEMBERSHIP_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock a membership only if it still has the observed role and active flag.
    ///
    /// Returns `None`, holding no lock, when the row changed since it was observed.
    pub(crate) async fn lock_membership_if_unchanged(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
        role: MembershipRole,
        is_active: bool,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(LOCK_MEMBERSHIP_IF_UNCHANGED_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .bind(role.as_str())
            .bind(is_active)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Count the tenant's active admins other than `membership`.
    ///
    /// Every active admin row of the tenant, `membership` included, is locked in
    /// primary key order and stays locked until the transaction ends. A concurrent
    /// caller doing the same blocks here and, once this transaction finishes, sees
    /// the committed admin set instead of the one it started from.
    pub(crate) async fn count_other_active_admins(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<u64, sqlx::Error> {
        let admins: Vec<Uuid> = query_scalar(LOCK_ACTIVE_ADMINS_SQL)
            .bind(tenant.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let excluded = membership.into_uuid();

        Ok(admins.iter().filter(|uuid| **uuid != excluded).count() as u64)
    }

    /// Insert a fresh active membership.
    ///
    /// Returns `None` when the user already has a membership in the tenant.
    pub(crate) async fn insert_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: &NewMembership,
        role: AssignableRole,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(INSERT_MEMBERSHIP_SQL)
            .bind(membership.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(membership.user.into_uuid())
            .bind(role.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert the owner membership of a tenant being provisioned.
    pub(crate) async fn insert_owner_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
        user: UserUuid,
    ) -> Result<Option<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(INSERT_MEMBERSHIP_SQL)
            .bind(membership.into_uuid())
            .bind(tenant.into_uuid())
            .bind(user.into_uuid())
            .bind(MembershipRole::Owner.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn reactivate_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
        role: AssignableRole,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(REACTIVATE_MEMBERSHIP_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_membership_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
        role: AssignableRole,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(UPDATE_MEMBERSHIP_ROLE_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .bind(role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn deactivate_membership(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<MembershipRecord, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(DEACTIVATE_MEMBERSHIP_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_memberships(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        include_inactive: bool,
    ) -> Result<Vec<MembershipRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipRecord>(LIST_MEMBERSHIPS_SQL)
            .bind(tenant.into_uuid())
            .bind(include_inactive)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn record_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: NewMembershipEvent,
    ) -> Result<MembershipEventRecord, sqlx::Error> {
        query_as::<Postgres, MembershipEventRecord>(INSERT_MEMBERSHIP_EVENT_SQL)
            .bind(MembershipEventUuid::new().into_uuid())
            .bind(event.tenant.into_uuid())
            .bind(event.membership.into_uuid())
            .bind(event.actor.into_uuid())
            .bind(event.kind.as_str())
            .bind(event.previous_role.map(MembershipRole::as_str))
            .bind(event.role.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_events(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        membership: MembershipUuid,
    ) -> Result<Vec<MembershipEventRecord>, sqlx::Error> {
        query_as::<Postgres, MembershipEventRecord>(LIST_MEMBERSHIP_EVENTS_SQL)
            .bind(tenant.into_uuid())
            .bind(membership.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MembershipRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MembershipUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            role: try_get_role(row, "role")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for MembershipEventRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = MembershipEventKind::parse(&kind).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "kind".to_string(),
            source: format!("unknown membership event kind `{kind}`").into(),
        })?;

        let previous_role = row
            .try_get::<Option<String>, _>("previous_role")?
            .map(|role| parse_role(&role, "previous_role"))
            .transpose()?;

        Ok(Self {
            uuid: MembershipEventUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            membership_uuid: MembershipUuid::from_uuid(row.try_get("membership_uuid")?),
            actor_uuid: UserUuid::from_uuid(row.try_get("actor_uuid")?),
            kind,
            previous_role,
            role: try_get_role(row, "role")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

fn try_get_role(row: &PgRow, col: &str) -> Result<MembershipRole, sqlx::Error> {
    let role: String = row.try_get(col)?;

    parse_role(&role, col)
}

fn parse_role(role: &str, col: &str) -> Result<MembershipRole, sqlx::Error> {
    role.parse::<MembershipRole>().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
