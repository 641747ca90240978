//! ERP Domain Concerns

pub mod memberships;
pub mod tenants;
pub mod users;
