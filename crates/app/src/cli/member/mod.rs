use clap::{Args, Subcommand};
use erp_app::context::AppContext;

use super::output::OutputFormat;

mod add;
mod history;
mod list;
mod remove;
mod role;

#[derive(Debug, Args)]
pub(crate) struct MemberCommand {
    #[command(subcommand)]
    command: MemberSubcommand,
}

#[derive(Debug, Subcommand)]
enum MemberSubcommand {
    /// Add a user to a tenant, or reactivate their previous membership
    Add(add::AddMemberArgs),

    /// Deactivate a membership
    Remove(remove::RemoveMemberArgs),

    /// Change the role of an active membership
    Role(role::UpdateRoleArgs),

    /// List a tenant's memberships
    List(list::ListMembersArgs),

    /// Show the recorded changes to a membership
    History(history::MemberHistoryArgs),
}

pub(crate) async fn run(
    command: MemberCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    match command.command {
        MemberSubcommand::Add(args) => add::run(args, ctx, format).await,
        MemberSubcommand::Remove(args) => remove::run(args, ctx, format).await,
        MemberSubcommand::Role(args) => role::run(args, ctx, format).await,
        MemberSubcommand::List(args) => list::run(args, ctx, format).await,
        MemberSubcommand::History(args) => history::run(args, ctx, format).await,
    }
}
