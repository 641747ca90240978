use clap::Args;
use erp_app::{
    context::AppContext,
    domain::{
        memberships::{data::NewMembership, records::MembershipUuid, roles::MembershipRole},
        tenants::records::TenantUuid,
        users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct AddMemberArgs {
    #[arg(long)]
    tenant: Uuid,

    /// User joining the tenant
    #[arg(long)]
    user: Uuid,

    /// Role to grant (admin, staff, viewer)
    #[arg(long)]
    role: MembershipRole,

    /// User performing the change, recorded in the audit trail
    #[arg(long)]
    actor: Uuid,

    /// Optional membership UUID; generated when omitted
    #[arg(long)]
    membership_uuid: Option<Uuid>,
}

pub(crate) async fn run(
    args: AddMemberArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let uuid = args
        .membership_uuid
        .map_or_else(MembershipUuid::new, MembershipUuid::from_uuid);

    let membership = ctx
        .memberships
        .add_user_to_tenant(
            TenantUuid::from_uuid(args.tenant),
            NewMembership {
                uuid,
                user: UserUuid::from_uuid(args.user),
                role: args.role,
            },
            UserUuid::from_uuid(args.actor),
        )
        .await
        .map_err(|error| format!("failed to add member: {error}"))?;

    format.render(&membership, output::membership)
}
