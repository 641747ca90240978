//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::DatabaseConfig,
    database::{self, Db},
    domain::{
        memberships::{MembershipsService, PgMembershipsService},
        tenants::{PgTenantsService, TenantsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub tenants: Arc<dyn TenantsService>,
    pub memberships: Arc<dyn MembershipsService>,
}

impl AppContext {
    /// Wire every service onto one database handle.
    #[must_use]
    pub fn from_db(db: Db) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.pool().clone())),
            tenants: Arc::new(PgTenantsService::new(db.clone())),
            memberships: Arc::new(PgMembershipsService::new(db)),
        }
    }

    /// Build application context from database configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, AppInitError> {
        let db = database::connect_with(config)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(db))
    }
}
