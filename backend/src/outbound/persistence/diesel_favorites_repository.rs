//! MySQL-backed `FavoritesRepository` implementation using Diesel ORM.
//!
//! Both multi-statement operations (`sync_favorites`, `update_diff`) run
//! inside a single transaction so readers never observe a partial
//! replacement or a half-applied diff; any statement failure rolls back the
//! whole operation. `update_diff` deletes before it inserts, so a shop id
//! present in both slices ends up favorited, and inserts use MySQL's
//! `INSERT IGNORE` so re-adding an existing favorite is a silent no-op
//! instead of a constraint violation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{FavoritesRepository, FavoritesRepositoryError};
use crate::domain::{Shop, ShopId, UserId};

use super::diesel_helpers::row_to_shop;
use super::models::{NewFavoriteRow, ShopRow};
use super::pool::{DbPool, PoolError};
use super::schema::{table_favorite, table_shop};

/// Diesel-backed implementation of the `FavoritesRepository` port.
#[derive(Clone)]
pub struct DieselFavoritesRepository {
    pool: DbPool,
}

impl DieselFavoritesRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain favorites store errors.
fn map_pool_error(error: PoolError) -> FavoritesRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FavoritesRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain favorites store errors.
fn map_diesel_error(error: diesel::result::Error) -> FavoritesRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FavoritesRepositoryError::connection("database connection error")
        }
        _ => FavoritesRepositoryError::query("database error"),
    }
}

#[async_trait]
impl FavoritesRepository for DieselFavoritesRepository {
    async fn sync_favorites(
        &self,
        user_id: UserId,
        shop_ids: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError> {
        let rows: Vec<NewFavoriteRow> = shop_ids
            .iter()
            .map(|shop_id| NewFavoriteRow {
                user_id: user_id.get(),
                shop_id: shop_id.get(),
            })
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::delete(
                    table_favorite::table.filter(table_favorite::user_id.eq(user_id.get())),
                )
                .execute(conn)
                .await?;

                if !rows.is_empty() {
                    diesel::insert_into(table_favorite::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        debug!(%user_id, count = shop_ids.len(), "favorites replaced");
        Ok(())
    }

    async fn update_diff(
        &self,
        user_id: UserId,
        added: &[ShopId],
        removed: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError> {
        let removed_ids: Vec<i32> = removed.iter().map(|shop_id| shop_id.get()).collect();
        let added_rows: Vec<NewFavoriteRow> = added
            .iter()
            .map(|shop_id| NewFavoriteRow {
                user_id: user_id.get(),
                shop_id: shop_id.get(),
            })
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                // Delete first: an id named in both slices must survive as
                // a favorite.
                if !removed_ids.is_empty() {
                    diesel::delete(
                        table_favorite::table
                            .filter(table_favorite::user_id.eq(user_id.get()))
                            .filter(table_favorite::shop_id.eq_any(removed_ids)),
                    )
                    .execute(conn)
                    .await?;
                }

                if !added_rows.is_empty() {
                    diesel::insert_or_ignore_into(table_favorite::table)
                        .values(&added_rows)
                        .execute(conn)
                        .await?;
                }

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        debug!(
            %user_id,
            added = added.len(),
            removed = removed.len(),
            "favorites diff applied"
        );
        Ok(())
    }

    async fn favorites_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Shop>, FavoritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ShopRow> = table_favorite::table
            .inner_join(table_shop::table.on(table_shop::shop_id.eq(table_favorite::shop_id)))
            .filter(table_favorite::user_id.eq(user_id.get()))
            .order(table_favorite::surrogate_key.desc())
            .select(ShopRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_shop).collect())
    }

    async fn remove_favorite(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<(), FavoritesRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Single statement; a missing row is a no-op, not an error.
        diesel::delete(
            table_favorite::table
                .filter(table_favorite::user_id.eq(user_id.get()))
                .filter(table_favorite::shop_id.eq(shop_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(())
    }
}
