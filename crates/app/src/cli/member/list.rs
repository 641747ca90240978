use clap::Args;
use erp_app::{context::AppContext, domain::tenants::records::TenantUuid};
use uuid::Uuid;

use crate::cli::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub(crate) struct ListMembersArgs {
    #[arg(long)]
    tenant: Uuid,

    /// Include removed memberships
    #[arg(long)]
    include_inactive: bool,
}

pub(crate) async fn run(
    args: ListMembersArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> Result<String, String> {
    let memberships = ctx
        .memberships
        .list_memberships(TenantUuid::from_uuid(args.tenant), args.include_inactive)
        .await
        .map_err(|error| format!("failed to list members: {error}"))?;

    format.render(memberships.as_slice(), output::membership_rows)
}

#[cfg(test)]
mod tests {
    use erp_app::domain::memberships::{MockMembershipsService, roles::MembershipRole};
    use mockall::predicate::{always, eq};

    use super::*;
    use crate::cli::member::fixtures;

    #[tokio::test]
    async fn renders_one_row_per_membership() {
        let owner = fixtures::membership(MembershipRole::Owner, true);
        let removed = fixtures::membership(MembershipRole::Viewer, false);
        let rows = vec![owner.clone(), removed.clone()];

        let mut memberships = MockMembershipsService::new();

        memberships
            .expect_list_memberships()
            .with(always(), eq(true))
            .times(1)
            .returning(move |_, _| Ok(rows.clone()));

        let ctx = fixtures::context(memberships);

        let output = run(
            ListMembersArgs {
                tenant: Uuid::now_v7(),
                include_inactive: true,
            },
            &ctx,
            OutputFormat::Text,
        )
        .await;

        let Ok(output) = output else {
            panic!("expected listing to succeed: {output:?}");
        };

        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("{}  {}  owner   active", owner.uuid, owner.user_uuid)
        );
        assert_eq!(
            lines[1],
            format!("{}  {}  viewer  inactive", removed.uuid, removed.user_uuid)
        );
    }

    #[tokio::test]
    async fn json_output_is_an_array() {
        let mut memberships = MockMembershipsService::new();

        memberships
            .expect_list_memberships()
            .returning(|_, _| Ok(vec![fixtures::membership(MembershipRole::Admin, true)]));

        let ctx = fixtures::context(memberships);

        let output = run(
            ListMembersArgs {
                tenant: Uuid::now_v7(),
                include_inactive: false,
            },
            &ctx,
            OutputFormat::Json,
        )
        .await;

        let Ok(output) = output else {
            panic!("expected listing to succeed: {output:?}");
        };

        let value: serde_json::Value =
            serde_json::from_str(&output).unwrap_or_else(|error| panic!("{error}: {output}"));

        assert_eq!(value[0]["role"], "admin");
        assert_eq!(value[0]["is_active"], true);
    }
}
