use erp_app::domain::{
    memberships::records::{MembershipEventRecord, MembershipRecord},
    tenants::records::ProvisionedTenant,
    users::records::UserRecord,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub(crate) fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    /// Render `value` as pretty JSON, or with `text` otherwise.
    pub(crate) fn render<T: Serialize + ?Sized>(
        self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<String, String> {
        match self {
            Self::Text => Ok(text(value)),
            Self::Json => serde_json::to_string_pretty(value)
                .map_err(|error| format!("failed to serialise output: {error}")),
        }
    }
}

pub(crate) fn user(user: &UserRecord) -> String {
    format!(
        "user_uuid: {}\nemail: {}\nname: {}",
        user.uuid, user.email, user.name
    )
}

pub(crate) fn provisioned_tenant(provisioned: &ProvisionedTenant) -> String {
    format!(
        "tenant_uuid: {}\ntenant_name: {}\nowner_membership_uuid: {}\nadmin_membership_uuid: {}",
        provisioned.tenant.uuid,
        provisioned.tenant.name,
        provisioned.owner.uuid,
        provisioned.admin.uuid
    )
}

pub(crate) fn membership(membership: &MembershipRecord) -> String {
    format!(
        "membership_uuid: {}\nuser_uuid: {}\nrole: {}\nactive: {}",
        membership.uuid, membership.user_uuid, membership.role, membership.is_active
    )
}

pub(crate) fn membership_rows(memberships: &[MembershipRecord]) -> String {
    memberships
        .iter()
        .map(|membership| {
            format!(
                "{}  {}  {:<6}  {}",
                membership.uuid,
                membership.user_uuid,
                membership.role,
                if membership.is_active { "active" } else { "inactive" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn event_rows(events: &[MembershipEventRecord]) -> String {
    events
        .iter()
        .map(|event| {
            let previous = event
                .previous_role
                .map_or_else(|| "-".to_string(), |role| role.to_string());

            format!(
                "{}  {:<12}  {} -> {}  by {}",
                event.created_at, event.kind, previous, event.role, event.actor_uuid
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
