//! MySQL-backed `ShopCatalogue` implementation using Diesel ORM.
//!
//! Search criteria translate to a single parameterized query: inactive
//! filters are omitted from the predicate list entirely, and every literal
//! travels as a bound parameter through the query builder. When the caller
//! is authenticated the query left-joins that user's favorite rows and the
//! presence of the joined surrogate key becomes the `is_favorite` flag.
//!
//! The joined and plain variants are separate query sources to Diesel, so
//! the conditional predicates are applied through a small macro rather than
//! duplicated by hand.

use async_trait::async_trait;
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ShopCatalogue, ShopCatalogueError};
use crate::domain::{ShopSearchCriteria, ShopSearchHit};

use super::diesel_helpers::row_to_shop;
use super::models::ShopRow;
use super::pool::{DbPool, PoolError};
use super::schema::{table_favorite, table_shop};

/// Diesel-backed implementation of the `ShopCatalogue` port.
#[derive(Clone)]
pub struct DieselShopCatalogue {
    pool: DbPool,
}

impl DieselShopCatalogue {
    /// Create a new catalogue with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain catalogue errors.
fn map_pool_error(error: PoolError) -> ShopCatalogueError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ShopCatalogueError::connection(message)
        }
    }
}

/// Map Diesel errors to domain catalogue errors.
fn map_diesel_error(error: diesel::result::Error) -> ShopCatalogueError {
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
            ShopCatalogueError::connection("database connection error")
        }
        _ => ShopCatalogueError::query("database error"),
    }
}

/// AND-append the active criteria predicates onto a boxed catalogue query.
macro_rules! apply_shop_filters {
    ($query:ident, $criteria:expr) => {{
        let mut query = $query;
        if let Some(ceiling) = $criteria.budget_ceiling() {
            query = query.filter(table_shop::budget.le(ceiling));
        }
        if let Some(band) = $criteria.distance() {
            query = query.filter(table_shop::distance.le(band.max_metres()));
        }
        let genres = $criteria.genres();
        if !genres.is_empty() {
            query = query.filter(table_shop::genre.eq_any(genres.to_vec()));
        }
        query
    }};
}

#[async_trait]
impl ShopCatalogue for DieselShopCatalogue {
    async fn search(
        &self,
        criteria: &ShopSearchCriteria,
    ) -> Result<Vec<ShopSearchHit>, ShopCatalogueError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let hits = match criteria.favorites_of() {
            Some(user_id) => {
                let base = table_shop::table
                    .left_join(
                        table_favorite::table.on(table_favorite::shop_id
                            .eq(table_shop::shop_id)
                            .and(table_favorite::user_id.eq(user_id.get()))),
                    )
                    .select((
                        ShopRow::as_select(),
                        table_favorite::surrogate_key.nullable(),
                    ))
                    .into_boxed::<Mysql>();
                let query = apply_shop_filters!(base, criteria);

                let rows: Vec<(ShopRow, Option<i64>)> = query
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                rows.into_iter()
                    .map(|(row, favorite_key)| ShopSearchHit {
                        shop: row_to_shop(row),
                        is_favorite: favorite_key.is_some(),
                    })
                    .collect()
            }
            None => {
                let base = table_shop::table
                    .select(ShopRow::as_select())
                    .into_boxed::<Mysql>();
                let query = apply_shop_filters!(base, criteria);

                let rows: Vec<ShopRow> = query
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                rows.into_iter()
                    .map(|row| ShopSearchHit {
                        shop: row_to_shop(row),
                        is_favorite: false,
                    })
                    .collect()
            }
        };

        Ok(hits)
    }
}
