use clap::Args;
use erp_app::{
    context::AppContext,
    domain::users::{data::NewUser, records::UserUuid},
};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Login email address
    #[arg(long)]
    email: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(
    args: CreateUserArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let uuid = args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid);

    let user = ctx
        .users
        .create_user(NewUser {
            uuid,
            email: args.email,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    format.render(&user, output::user)
}
