use clap::{Parser, Subcommand};
use erp_app::{
    config::{DatabaseConfig, LoggingConfig},
    context::AppContext,
    observability,
};

use self::output::OutputFormat;

mod member;
mod output;
mod tenant;
mod user;

#[derive(Debug, Parser)]
#[command(name = "erp-app", about = "ERP tenant administration CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Tenant(tenant::TenantCommand),
    Member(member::MemberCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init(&self.logging).map_err(|error| error.to_string())?;

        let ctx = AppContext::from_config(&self.database)
            .await
            .map_err(|error| format!("{error}: {}", source_message(&error)))?;

        let format = OutputFormat::from_json_flag(self.json);

        let output = match self.command {
            Commands::User(command) => user::run(command, &ctx, format).await,
            Commands::Tenant(command) => tenant::run(command, &ctx, format).await,
            Commands::Member(command) => member::run(command, &ctx, format).await,
        }?;

        println!("{output}");

        Ok(())
    }
}

fn source_message(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(String::new, ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_member_role_command() {
        let cli = Cli::try_parse_from([
            "erp-app",
            "--database-url",
            "postgresql://localhost/erp",
            "member",
            "role",
            "--tenant",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5b",
            "--membership",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5c",
            "--role",
            "staff",
            "--actor",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5d",
            "--json",
        ]);

        let Ok(cli) = cli else {
            panic!("expected arguments to parse: {cli:?}");
        };

        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Member(_)));
    }

    #[test]
    fn rejects_unknown_role() {
        let cli = Cli::try_parse_from([
            "erp-app",
            "--database-url",
            "postgresql://localhost/erp",
            "member",
            "role",
            "--tenant",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5b",
            "--membership",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5c",
            "--role",
            "superuser",
            "--actor",
            "0190a0b1-c2d3-7e4f-8a9b-0c1d2e3f4a5d",
        ]);

        assert!(cli.is_err());
    }
}
