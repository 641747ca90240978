use clap::Args;
use erp_app::{
    context::AppContext,
    domain::{
        tenants::{data::NewTenant, records::TenantUuid},
        users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    /// Tenant display name
    #[arg(long)]
    name: String,

    /// User who becomes the permanent owner
    #[arg(long)]
    owner: Uuid,

    /// User who becomes the first administrator
    #[arg(long)]
    admin: Uuid,

    /// Optional tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,
}

pub(crate) async fn run(
    args: CreateTenantArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let uuid = args
        .tenant_uuid
        .map_or_else(TenantUuid::new, TenantUuid::from_uuid);

    let provisioned = ctx
        .tenants
        .create_tenant(NewTenant {
            uuid,
            name: args.name,
            owner: UserUuid::from_uuid(args.owner),
            admin: UserUuid::from_uuid(args.admin),
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    format.render(&provisioned, output::provisioned_tenant)
}
