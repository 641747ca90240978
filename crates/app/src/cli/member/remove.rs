use clap::Args;
use erp_app::{
    context::AppContext,
    domain::{
        memberships::records::MembershipUuid, tenants::records::TenantUuid,
        users::records::UserUuid,
    },
};
use serde_json::json;
use uuid::Uuid;

use crate::cli::output::OutputFormat;

#[derive(Debug, Args)]
pub(crate) struct RemoveMemberArgs {
    #[arg(long)]
    tenant: Uuid,

    #[arg(long)]
    membership: Uuid,

    /// User performing the change, recorded in the audit trail
    #[arg(long)]
    actor: Uuid,
}

pub(crate) async fn run(
    args: RemoveMemberArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let membership = MembershipUuid::from_uuid(args.membership);

    ctx.memberships
        .remove_user_from_tenant(
            TenantUuid::from_uuid(args.tenant),
            membership,
            UserUuid::from_uuid(args.actor),
        )
        .await
        .map_err(|error| format!("failed to remove member: {error}"))?;

    format.render(
        &json!({ "membership_uuid": membership, "is_active": false }),
        |_| format!("membership_uuid: {membership}\nactive: false"),
    )
}
