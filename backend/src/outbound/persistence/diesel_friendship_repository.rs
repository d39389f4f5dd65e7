//! MySQL-backed `FriendshipRepository` implementation using Diesel ORM.
//!
//! Every operation canonicalizes its argument pair through
//! [`FriendPair`] before issuing SQL, so the no-self-friend invariant is
//! enforced in the application even if the database CHECK constraint is
//! missing, and a friendship between X and Y hits the same row regardless
//! of which side initiates.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};
use crate::domain::{FriendPair, UserId};

use super::models::NewFriendshipRow;
use super::pool::{DbPool, PoolError};
use super::schema::friendship;

/// Diesel-backed implementation of the `FriendshipRepository` port.
#[derive(Clone)]
pub struct DieselFriendshipRepository {
    pool: DbPool,
}

impl DieselFriendshipRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain friendship store errors.
fn map_pool_error(error: PoolError) -> FriendshipRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FriendshipRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain friendship store errors.
///
/// A unique violation on insert means the canonical pair already has a row;
/// that condition is surfaced distinctly rather than flattened into a
/// generic failure.
fn map_diesel_error(error: diesel::result::Error) -> FriendshipRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            FriendshipRepositoryError::already_friends()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FriendshipRepositoryError::connection("database connection error")
        }
        _ => FriendshipRepositoryError::query("database error"),
    }
}

fn canonicalize(a: UserId, b: UserId) -> Result<FriendPair, FriendshipRepositoryError> {
    FriendPair::new(a, b).map_err(|_| FriendshipRepositoryError::self_friendship())
}

#[async_trait]
impl FriendshipRepository for DieselFriendshipRepository {
    async fn create_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError> {
        let pair = canonicalize(a, b)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewFriendshipRow {
            user_id_small: pair.small().get(),
            user_id_large: pair.large().get(),
        };
        diesel::insert_into(friendship::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(small = %pair.small(), large = %pair.large(), "friendship created");
        Ok(())
    }

    async fn delete_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError> {
        let pair = canonicalize(a, b)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            friendship::table
                .filter(friendship::user_id_small.eq(pair.small().get()))
                .filter(friendship::user_id_large.eq(pair.large().get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn friendship_exists(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<bool, FriendshipRepositoryError> {
        // An existence check is a safe query: a self-pair is simply "not
        // friends" rather than an invariant violation.
        let Ok(pair) = FriendPair::new(a, b) else {
            return Ok(false);
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = friendship::table
            .filter(friendship::user_id_small.eq(pair.small().get()))
            .filter(friendship::user_id_large.eq(pair.large().get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }

    async fn friends_of(
        &self,
        user_id: UserId,
    ) -> Result<Vec<UserId>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, i32)> = friendship::table
            .filter(
                friendship::user_id_small
                    .eq(user_id.get())
                    .or(friendship::user_id_large.eq(user_id.get())),
            )
            .select((friendship::user_id_small, friendship::user_id_large))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Whichever stored id is not ours is the friend.
        let friends = rows
            .into_iter()
            .filter_map(|(small, large)| {
                let other = if small == user_id.get() { large } else { small };
                UserId::new(other).ok()
            })
            .collect();

        Ok(friends)
    }
}
