//! Favorites handlers for the authenticated user.
//!
//! ```text
//! GET    /api/v1/users/me/favorites
//! PUT    /api/v1/users/me/favorites            {"shopIds":[1,2,3]}
//! PATCH  /api/v1/users/me/favorites            {"added":[4],"removed":[2]}
//! DELETE /api/v1/users/me/favorites/{shop_id}
//! ```

use actix_web::{delete, get, patch, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FavoritesRepositoryError;
use crate::domain::{Error, Shop, ShopId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

fn map_favorites_error(error: FavoritesRepositoryError) -> Error {
    match error {
        FavoritesRepositoryError::Connection { message } => Error::service_unavailable(message),
        FavoritesRepositoryError::Query { message } => Error::internal(message),
    }
}

fn to_shop_ids(raw: Vec<i32>) -> Vec<ShopId> {
    raw.into_iter().map(ShopId::new).collect()
}

/// List the authenticated user's favorites, most recently added first.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/favorites",
    responses(
        (status = 200, description = "Favorite shops", body = [Shop]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/users/me/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Shop>>> {
    let user_id = session.require_user_id()?;
    let shops = state
        .favorites
        .favorites_by_user(user_id)
        .await
        .map_err(map_favorites_error)?;
    Ok(web::Json(shops))
}

/// Body replacing the whole favorite set.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceFavoritesRequest {
    /// The complete new favorite set; an empty list clears everything.
    pub shop_ids: Vec<i32>,
}

/// Replace the authenticated user's entire favorite set.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/favorites",
    request_body = ReplaceFavoritesRequest,
    responses(
        (status = 204, description = "Favorites replaced"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "replaceFavorites"
)]
#[put("/users/me/favorites")]
pub async fn replace_favorites(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ReplaceFavoritesRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let shop_ids = to_shop_ids(payload.into_inner().shop_ids);
    state
        .favorites
        .sync_favorites(user_id, &shop_ids)
        .await
        .map_err(map_favorites_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body applying an incremental favorite change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesDiffRequest {
    /// Shop ids to add; re-adding an existing favorite is a no-op.
    #[serde(default)]
    pub added: Vec<i32>,
    /// Shop ids to remove; absent ids are ignored.
    #[serde(default)]
    pub removed: Vec<i32>,
}

/// Apply an add/remove diff to the authenticated user's favorites.
///
/// An id named in both lists ends up favorited.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me/favorites",
    request_body = FavoritesDiffRequest,
    responses(
        (status = 204, description = "Diff applied"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "patchFavorites"
)]
#[patch("/users/me/favorites")]
pub async fn patch_favorites(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FavoritesDiffRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    let added = to_shop_ids(body.added);
    let removed = to_shop_ids(body.removed);
    state
        .favorites
        .update_diff(user_id, &added, &removed)
        .await
        .map_err(map_favorites_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove a single favorite; removing an absent favorite still answers 204.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/favorites/{shop_id}",
    params(("shop_id" = i32, Path, description = "Catalogue shop id")),
    responses(
        (status = 204, description = "Favorite removed (or was absent)"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/users/me/favorites/{shop_id}")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let shop_id = ShopId::new(path.into_inner());
    state
        .favorites
        .remove_favorite(user_id, shop_id)
        .await
        .map_err(map_favorites_error)?;
    Ok(HttpResponse::NoContent().finish())
}
