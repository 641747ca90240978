use clap::{Args, Subcommand};
use erp_app::context::AppContext;

use super::output::OutputFormat;

mod create;

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
}

pub(crate) async fn run(
    command: UserCommand,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    match command.command {
        UserSubcommand::Create(args) => create::run(args, ctx, format).await,
    }
}
