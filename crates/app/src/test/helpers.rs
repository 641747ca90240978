//! Test Helpers

use crate::{domain::tenants::records::TenantUuid, test::TestContext};

/// Active owner and admin counts for a tenant, read past row-level security.
pub(crate) async fn active_role_counts(ctx: &TestContext, tenant: TenantUuid) -> (i64, i64) {
    sqlx::query_as(
        "SELECT count(*) FILTER (WHERE role = 'owner'), count(*) FILTER (WHERE role = 'admin') \
         FROM tenant_memberships WHERE tenant_uuid = $1 AND is_active",
    )
    .bind(tenant.into_uuid())
    .fetch_one(ctx.db.pool())
    .await
    .expect("Failed to count active roles")
}

/// Panics unless the tenant has exactly one active owner and at least one active admin.
pub(crate) async fn assert_tenant_invariants(ctx: &TestContext, tenant: TenantUuid) {
    let (owners, admins) = active_role_counts(ctx, tenant).await;

    assert_eq!(owners, 1, "tenant must have exactly one active owner");
    assert!(admins >= 1, "tenant must keep an active admin, found {admins}");
}

/// Number of audit rows stored for a tenant.
pub(crate) async fn event_count(ctx: &TestContext, tenant: TenantUuid) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM tenant_membership_events WHERE tenant_uuid = $1")
        .bind(tenant.into_uuid())
        .fetch_one(ctx.db.pool())
        .await
        .expect("Failed to count membership events")
}
