//! MySQL-backed `UserIconRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserIconRepository, UserIconRepositoryError};

use super::pool::{DbPool, PoolError};
use super::schema::table_user_icon;

/// Diesel-backed implementation of the `UserIconRepository` port.
#[derive(Clone)]
pub struct DieselUserIconRepository {
    pool: DbPool,
}

impl DieselUserIconRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserIconRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserIconRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserIconRepositoryError {
    debug!(error = %error, "diesel operation failed");
    UserIconRepositoryError::query("database error")
}

#[async_trait]
impl UserIconRepository for DieselUserIconRepository {
    async fn icon_address(
        &self,
        profile_photo_id: i32,
    ) -> Result<Option<String>, UserIconRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        table_user_icon::table
            .filter(table_user_icon::profile_photo_id.eq(profile_photo_id))
            .select(table_user_icon::photo_address)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, UserIconRepositoryError::Connection { .. }));
    }

    #[test]
    fn diesel_error_maps_to_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, UserIconRepositoryError::Query { .. }));
    }
}
