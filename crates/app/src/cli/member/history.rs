use clap::Args;
use erp_app::{
    context::AppContext,
    domain::{memberships::records::MembershipUuid, tenants::records::TenantUuid},
};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct MemberHistoryArgs {
    #[arg(long)]
    tenant: Uuid,

    #[arg(long)]
    membership: Uuid,
}

pub(crate) async fn run(
    args: MemberHistoryArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let events = ctx
        .memberships
        .list_membership_events(
            TenantUuid::from_uuid(args.tenant),
            MembershipUuid::from_uuid(args.membership),
        )
        .await
        .map_err(|error| format!("failed to load membership history: {error}"))?;

    format.render(events.as_slice(), output::event_rows)
}
