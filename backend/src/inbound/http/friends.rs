//! Friendship handlers for the authenticated user.
//!
//! ```text
//! GET    /api/v1/users/me/friends
//! POST   /api/v1/users/me/friends              {"userId":10000002}
//! DELETE /api/v1/users/me/friends/{user_id}
//! GET    /api/v1/users/me/friends/{user_id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FriendshipRepositoryError;
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;
use crate::inbound::http::ApiResult;

fn map_friendship_error(error: FriendshipRepositoryError) -> Error {
    match error {
        FriendshipRepositoryError::SelfFriendship => {
            Error::invalid_request("users cannot befriend themselves")
        }
        FriendshipRepositoryError::AlreadyFriends => {
            Error::conflict("these users are already friends")
        }
        FriendshipRepositoryError::Connection { message } => Error::service_unavailable(message),
        FriendshipRepositoryError::Query { message } => Error::internal(message),
    }
}

fn parse_user_id(raw: i32) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| map_user_validation_error("userId", err))
}

/// List the authenticated user's friend ids.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/friends",
    responses(
        (status = 200, description = "Friend ids", body = [i32]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/users/me/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserId>>> {
    let user_id = session.require_user_id()?;
    let friends = state
        .friendships
        .friends_of(user_id)
        .await
        .map_err(map_friendship_error)?;
    Ok(web::Json(friends))
}

/// Body naming the user to befriend.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    /// The other user's id.
    pub user_id: i32,
}

/// Create a friendship between the caller and another user.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/friends",
    request_body = FriendRequest,
    responses(
        (status = 201, description = "Friendship created"),
        (status = 400, description = "Self-friendship or bad id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Already friends", body = Error)
    ),
    tags = ["friends"],
    operation_id = "addFriend"
)]
#[post("/users/me/friends")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FriendRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let other = parse_user_id(payload.user_id)?;
    state
        .friendships
        .create_friendship(user_id, other)
        .await
        .map_err(map_friendship_error)?;
    Ok(HttpResponse::Created().finish())
}

/// Delete a friendship; deleting an absent friendship still answers 204.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/friends/{user_id}",
    params(("user_id" = i32, Path, description = "The other user's id")),
    responses(
        (status = 204, description = "Friendship removed (or was absent)"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["friends"],
    operation_id = "removeFriend"
)]
#[delete("/users/me/friends/{user_id}")]
pub async fn remove_friend(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let other = parse_user_id(path.into_inner())?;
    state
        .friendships
        .delete_friendship(user_id, other)
        .await
        .map_err(map_friendship_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Response for friendship existence checks.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipStatus {
    /// Whether the two users are friends.
    pub friends: bool,
}

/// Check whether the caller and another user are friends.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/friends/{user_id}",
    params(("user_id" = i32, Path, description = "The other user's id")),
    responses(
        (status = 200, description = "Friendship status", body = FriendshipStatus),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["friends"],
    operation_id = "friendshipStatus"
)]
#[get("/users/me/friends/{user_id}")]
pub async fn friendship_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<FriendshipStatus>> {
    let user_id = session.require_user_id()?;
    let other = parse_user_id(path.into_inner())?;
    let friends = state
        .friendships
        .friendship_exists(user_id, other)
        .await
        .map_err(map_friendship_error)?;
    Ok(web::Json(FriendshipStatus { friends }))
}
