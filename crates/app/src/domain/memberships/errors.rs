//! Memberships service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Membership service error variants.
#[derive(Debug, Error)]
pub enum MembershipsServiceError {
    /// The requested role cannot be granted through this operation.
    #[error("the owner role can only be assigned when a tenant is provisioned")]
    InvalidRoleAssignment,

    /// The change would demote, remove or reassign the tenant owner.
    #[error("the tenant owner cannot be changed")]
    OwnerProtected,

    /// The change would leave the tenant without an active admin.
    #[error("a tenant must keep at least one active admin")]
    LastAdminProtected,

    /// Membership was not found in the tenant.
    #[error("membership not found")]
    NotFound,

    /// A membership with the supplied UUID already exists.
    #[error("membership already exists")]
    AlreadyExists,

    /// Referenced user or tenant does not exist.
    #[error("related resource not found")]
    InvalidReference,

    /// The membership kept changing underneath the operation.
    #[error("membership changed concurrently, retry the request")]
    Contended,

    /// Underlying SQL/storage error, including lock and pool timeouts.
    #[error("storage error")]
    Storage(#[source] Error),
}

/// Broad classification of [`MembershipsServiceError`] for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipsErrorKind {
    /// A business rule rejected the request. Never retried.
    RuleViolation,

    /// The addressed record does not exist.
    NotFound,

    /// Transient failure. Safe to resubmit, nothing was applied.
    Infrastructure,
}

impl MembershipsServiceError {
    #[must_use]
    pub fn kind(&self) -> MembershipsErrorKind {
        match self {
            Self::InvalidRoleAssignment
            | Self::OwnerProtected
            | Self::LastAdminProtected
            | Self::AlreadyExists
            | Self::InvalidReference => MembershipsErrorKind::RuleViolation,
            Self::NotFound => MembershipsErrorKind::NotFound,
            Self::Contended | Self::Storage(_) => MembershipsErrorKind::Infrastructure,
        }
    }

    /// Whether resubmitting the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == MembershipsErrorKind::Infrastructure
    }
}

impl From<Error> for MembershipsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::Other | _) | None => Self::Storage(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_violations_are_not_retryable() {
        for error in [
            MembershipsServiceError::InvalidRoleAssignment,
            MembershipsServiceError::OwnerProtected,
            MembershipsServiceError::LastAdminProtected,
        ] {
            assert_eq!(error.kind(), MembershipsErrorKind::RuleViolation);
            assert!(!error.is_retryable(), "{error} should not be retryable");
        }
    }

    #[test]
    fn storage_failures_are_retryable() {
        let error = MembershipsServiceError::from(Error::PoolTimedOut);

        assert!(matches!(error, MembershipsServiceError::Storage(_)));
        assert!(error.is_retryable());
        assert!(MembershipsServiceError::Contended.is_retryable());
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = MembershipsServiceError::from(Error::RowNotFound);

        assert!(matches!(error, MembershipsServiceError::NotFound));
        assert_eq!(error.kind(), MembershipsErrorKind::NotFound);
        assert!(!error.is_retryable());
    }
}
