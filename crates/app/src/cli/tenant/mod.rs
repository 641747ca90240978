use clap::{Args, Subcommand};
use erp_app::context::AppContext;

use super::output::OutputFormat;

mod create;

#[derive(Debug, Args)]
pub(crate) struct TenantCommand {
    #[command(subcommand)]
    command: TenantSubcommand,
}

#[derive(Debug, Subcommand)]
enum TenantSubcommand {
    Create(create::CreateTenantArgs),
}

pub(crate) async fn run(
    command: TenantCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    match command.command {
        TenantSubcommand::Create(args) => create::run(args, ctx, format).await,
    }
}
