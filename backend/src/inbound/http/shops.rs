//! Shop search handlers.
//!
//! ```text
//! GET /api/v1/shops?budget=2000&distance=3&genre=ramen,izakaya
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::ports::ShopCatalogueError;
use crate::domain::{DistanceBand, Error, ShopSearchCriteria, ShopSearchHit};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

fn map_catalogue_error(error: ShopCatalogueError) -> Error {
    match error {
        ShopCatalogueError::Connection { message } => Error::service_unavailable(message),
        ShopCatalogueError::Query { message } => Error::internal(message),
    }
}

/// Query string for catalogue searches. Every filter is optional; omitted
/// filters match everything rather than matching emptiness.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ShopSearchQuery {
    /// Budget upper bound; the store applies its fixed buffer on top.
    pub budget: Option<i32>,
    /// Legacy distance code: `2` (500 m), `3` (1000 m) or `4` (3000 m).
    /// Other values disable the distance filter.
    pub distance: Option<String>,
    /// Comma-separated genre tags.
    pub genre: Option<String>,
}

impl ShopSearchQuery {
    fn into_criteria(self, session: &SessionContext) -> Result<ShopSearchCriteria, Error> {
        let mut criteria = ShopSearchCriteria::unfiltered();
        if let Some(budget) = self.budget {
            criteria = criteria.with_budget(budget);
        }
        if let Some(band) = self.distance.as_deref().and_then(DistanceBand::from_code) {
            criteria = criteria.with_distance(band);
        }
        if let Some(raw) = self.genre.as_deref() {
            criteria = criteria.with_genre_list(raw);
        }
        // A logged-in caller gets is_favorite annotations; anonymous
        // searches skip the favorites join entirely.
        if let Some(user_id) = session.user_id()? {
            criteria = criteria.with_favorites_of(user_id);
        }
        Ok(criteria)
    }
}

/// Search the shop catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/shops",
    params(ShopSearchQuery),
    responses(
        (status = 200, description = "Matching shops", body = [ShopSearchHit]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["shops"],
    operation_id = "searchShops",
    security([])
)]
#[get("/shops")]
pub async fn search_shops(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ShopSearchQuery>,
) -> ApiResult<web::Json<Vec<ShopSearchHit>>> {
    let criteria = query.into_inner().into_criteria(&session)?;
    let hits = state
        .shops
        .search(&criteria)
        .await
        .map_err(map_catalogue_error)?;
    Ok(web::Json(hits))
}
