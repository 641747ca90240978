use clap::Args;
use erp_app::{
    context::AppContext,
    domain::{
        memberships::{records::MembershipUuid, roles::MembershipRole},
        tenants::records::TenantUuid,
        users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct UpdateRoleArgs {
    #[arg(long)]
    tenant: Uuid,

    #[arg(long)]
    membership: Uuid,

    /// New role (admin, staff, viewer)
    #[arg(long)]
    role: MembershipRole,

    /// User performing the change, recorded in the audit trail
    #[arg(long)]
    actor: Uuid,
}

pub(crate) async fn run(
    args: UpdateRoleArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let membership = ctx
        .memberships
        .update_user_role(
            TenantUuid::from_uuid(args.tenant),
            MembershipUuid::from_uuid(args.membership),
            args.role,
            UserUuid::from_uuid(args.actor),
        )
        .await
        .map_err(|error| format!("failed to update role: {error}"))?;

    format.render(&membership, output::membership)
}
