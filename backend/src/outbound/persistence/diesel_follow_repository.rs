//! MySQL-backed `FollowRepository` implementation using Diesel ORM.
//!
//! The follow graph is directed and independent of friendships. Self-follow
//! is rejected before any SQL; re-following surfaces the unique pair
//! constraint as a distinct "already following" conflict. Listing queries
//! join account rows and left-join the icon table so users without an icon
//! still appear.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{FollowRepository, FollowRepositoryError};
use crate::domain::{SocialProfile, UserId};

use super::models::NewRelationshipRow;
use super::pool::{DbPool, PoolError};
use super::schema::{relationship, table_user, table_user_icon};

/// Diesel-backed implementation of the `FollowRepository` port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain follow store errors.
fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FollowRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain follow store errors.
fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
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
            FollowRepositoryError::already_following()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FollowRepositoryError::connection("database connection error")
        }
        _ => FollowRepositoryError::query("database error"),
    }
}

fn rows_to_profiles(rows: Vec<(i32, String, Option<String>)>) -> Vec<SocialProfile> {
    rows.into_iter()
        .filter_map(|(raw_id, user_name, photo_address)| {
            UserId::new(raw_id).ok().map(|user_id| SocialProfile {
                user_id,
                user_name,
                photo_address,
            })
        })
        .collect()
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn follow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError> {
        if follower == followed {
            return Err(FollowRepositoryError::self_follow());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewRelationshipRow {
            follower_id: follower.get(),
            followed_id: followed.get(),
        };
        diesel::insert_into(relationship::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(%follower, %followed, "follow edge created");
        Ok(())
    }

    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError> {
        if follower == followed {
            return Err(FollowRepositoryError::self_follow());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(
            relationship::table
                .filter(relationship::follower_id.eq(follower.get()))
                .filter(relationship::followed_id.eq(followed.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn followed_by(
        &self,
        follower: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, String, Option<String>)> = relationship::table
            .inner_join(table_user::table.on(table_user::user_id.eq(relationship::followed_id)))
            .left_join(
                table_user_icon::table.on(table_user_icon::profile_photo_id
                    .nullable()
                    .eq(table_user::profile_photo_id)),
            )
            .filter(relationship::follower_id.eq(follower.get()))
            .select((
                table_user::user_id,
                table_user::user_name,
                table_user_icon::photo_address.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_profiles(rows))
    }

    async fn followers_of(
        &self,
        followed: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, String, Option<String>)> = relationship::table
            .inner_join(table_user::table.on(table_user::user_id.eq(relationship::follower_id)))
            .left_join(
                table_user_icon::table.on(table_user_icon::profile_photo_id
                    .nullable()
                    .eq(table_user::profile_photo_id)),
            )
            .filter(relationship::followed_id.eq(followed.get()))
            .select((
                table_user::user_id,
                table_user::user_name,
                table_user_icon::photo_address.nullable(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_profiles(rows))
    }

    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        // A user never follows themselves; answer without a round trip.
        if follower == followed {
            return Ok(false);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = relationship::table
            .filter(relationship::follower_id.eq(follower.get()))
            .filter(relationship::followed_id.eq(followed.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, FollowRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn unique_violation_maps_to_already_following() {
        let diesel_err = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("Duplicate entry '1-2' for key 'relationship.PRIMARY'".to_owned()),
        );

        assert_eq!(
            map_diesel_error(diesel_err),
            FollowRepositoryError::AlreadyFollowing
        );
    }

    #[rstest]
    fn profiles_keep_missing_icons_as_none() {
        let profiles = rows_to_profiles(vec![
            (10_000_001, "Taro".to_owned(), None),
            (
                10_000_002,
                "Hanako".to_owned(),
                Some("https://example.com/icon.png".to_owned()),
            ),
        ]);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].photo_address, None);
        assert_eq!(
            profiles[1].photo_address.as_deref(),
            Some("https://example.com/icon.png")
        );
    }
}
