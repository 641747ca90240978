//! Membership invariant rules.
//!
//! Pure decisions only. Callers must hold the tenant's admin-set lock before
//! passing `other_admins` for a membership that is currently an active admin.

use crate::domain::memberships::{errors::MembershipsServiceError, roles::MembershipRole};

/// A requested change to an active membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Change {
    Deactivate,
    Assign(MembershipRole),
}

/// Check a change to an active membership holding `current`.
///
/// `other_admins` is the number of active admins in the tenant excluding the
/// membership being changed.
pub(crate) fn check_change(
    current: MembershipRole,
    change: Change,
    other_admins: u64,
) -> Result<(), MembershipsServiceError> {
    match (current, change) {
        (MembershipRole::Owner, _) | (_, Change::Assign(MembershipRole::Owner)) => {
            Err(MembershipsServiceError::OwnerProtected)
        }
        (MembershipRole::Admin, Change::Deactivate)
        | (MembershipRole::Admin, Change::Assign(MembershipRole::Staff | MembershipRole::Viewer))
            if other_admins == 0 =>
        {
            Err(MembershipsServiceError::LastAdminProtected)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_cannot_be_removed_or_demoted() {
        for change in [
            Change::Deactivate,
            Change::Assign(MembershipRole::Admin),
            Change::Assign(MembershipRole::Viewer),
            Change::Assign(MembershipRole::Owner),
        ] {
            let result = check_change(MembershipRole::Owner, change, 5);

            assert!(
                matches!(result, Err(MembershipsServiceError::OwnerProtected)),
                "expected OwnerProtected for {change:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn nobody_can_be_promoted_to_owner() {
        for current in [
            MembershipRole::Admin,
            MembershipRole::Staff,
            MembershipRole::Viewer,
        ] {
            let result = check_change(current, Change::Assign(MembershipRole::Owner), 3);

            assert!(
                matches!(result, Err(MembershipsServiceError::OwnerProtected)),
                "expected OwnerProtected for {current}, got {result:?}"
            );
        }
    }

    #[test]
    fn last_admin_cannot_leave_or_be_demoted() {
        for change in [
            Change::Deactivate,
            Change::Assign(MembershipRole::Staff),
            Change::Assign(MembershipRole::Viewer),
        ] {
            let result = check_change(MembershipRole::Admin, change, 0);

            assert!(
                matches!(result, Err(MembershipsServiceError::LastAdminProtected)),
                "expected LastAdminProtected for {change:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn admin_with_peers_can_leave_or_be_demoted() {
        assert!(check_change(MembershipRole::Admin, Change::Deactivate, 1).is_ok());
        assert!(
            check_change(MembershipRole::Admin, Change::Assign(MembershipRole::Viewer), 2).is_ok()
        );
    }

    #[test]
    fn admin_keeping_admin_role_needs_no_peers() {
        assert!(
            check_change(MembershipRole::Admin, Change::Assign(MembershipRole::Admin), 0).is_ok()
        );
    }

    #[test]
    fn staff_and_viewers_change_freely() {
        assert!(check_change(MembershipRole::Staff, Change::Deactivate, 0).is_ok());
        assert!(
            check_change(MembershipRole::Viewer, Change::Assign(MembershipRole::Admin), 0).is_ok()
        );
        assert!(
            check_change(MembershipRole::Staff, Change::Assign(MembershipRole::Viewer), 0).is_ok()
        );
    }
}
