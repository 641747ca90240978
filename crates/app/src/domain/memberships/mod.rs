//! Tenant Memberships
//!
//! Memberships link a user to a tenant with a role. Two invariants hold for every
//! tenant after each committed operation: exactly one active owner exists, and at
//! least one active admin exists. The owner is created with the tenant and can
//! never be demoted, removed or reassigned.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod roles;
mod rules;
pub mod service;

pub use errors::MembershipsServiceError;
pub use service::*;
