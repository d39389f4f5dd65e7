//! Follow graph handlers for the authenticated user.
//!
//! ```text
//! GET    /api/v1/users/me/follows
//! GET    /api/v1/users/me/followers
//! POST   /api/v1/users/me/follows              {"userId":10000002}
//! DELETE /api/v1/users/me/follows/{user_id}
//! GET    /api/v1/users/me/follows/{user_id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FollowRepositoryError;
use crate::domain::{Error, SocialProfile, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;
use crate::inbound::http::ApiResult;

fn map_follow_error(error: FollowRepositoryError) -> Error {
    match error {
        FollowRepositoryError::SelfFollow => {
            Error::invalid_request("users cannot follow themselves")
        }
        FollowRepositoryError::AlreadyFollowing => {
            Error::conflict("this user is already being followed")
        }
        FollowRepositoryError::Connection { message } => Error::service_unavailable(message),
        FollowRepositoryError::Query { message } => Error::internal(message),
    }
}

fn parse_user_id(raw: i32) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| map_user_validation_error("userId", err))
}

/// List the users the caller follows.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/follows",
    responses(
        (status = 200, description = "Followed users", body = [SocialProfile]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["follows"],
    operation_id = "listFollows"
)]
#[get("/users/me/follows")]
pub async fn list_follows(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SocialProfile>>> {
    let user_id = session.require_user_id()?;
    let followed = state
        .follows
        .followed_by(user_id)
        .await
        .map_err(map_follow_error)?;
    Ok(web::Json(followed))
}

/// List the users following the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/followers",
    responses(
        (status = 200, description = "Followers", body = [SocialProfile]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["follows"],
    operation_id = "listFollowers"
)]
#[get("/users/me/followers")]
pub async fn list_followers(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SocialProfile>>> {
    let user_id = session.require_user_id()?;
    let followers = state
        .follows
        .followers_of(user_id)
        .await
        .map_err(map_follow_error)?;
    Ok(web::Json(followers))
}

/// Body naming the user to follow.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    /// The user to follow.
    pub user_id: i32,
}

/// Follow another user.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/follows",
    request_body = FollowRequest,
    responses(
        (status = 201, description = "Edge created"),
        (status = 400, description = "Self-follow or bad id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Already following", body = Error)
    ),
    tags = ["follows"],
    operation_id = "follow"
)]
#[post("/users/me/follows")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FollowRequest>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let followed = parse_user_id(payload.user_id)?;
    state
        .follows
        .follow(follower, followed)
        .await
        .map_err(map_follow_error)?;
    Ok(HttpResponse::Created().finish())
}

/// Unfollow a user; removing an absent edge still answers 204.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/follows/{user_id}",
    params(("user_id" = i32, Path, description = "The followed user's id")),
    responses(
        (status = 204, description = "Edge removed (or was absent)"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["follows"],
    operation_id = "unfollow"
)]
#[delete("/users/me/follows/{user_id}")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let followed = parse_user_id(path.into_inner())?;
    state
        .follows
        .unfollow(follower, followed)
        .await
        .map_err(map_follow_error)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Response for follow checks.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatus {
    /// Whether the caller follows the named user.
    pub following: bool,
}

/// Check whether the caller follows another user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/follows/{user_id}",
    params(("user_id" = i32, Path, description = "The followed user's id")),
    responses(
        (status = 200, description = "Follow status", body = FollowStatus),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["follows"],
    operation_id = "followStatus"
)]
#[get("/users/me/follows/{user_id}")]
pub async fn follow_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<FollowStatus>> {
    let follower = session.require_user_id()?;
    let followed = parse_user_id(path.into_inner())?;
    let following = state
        .follows
        .is_following(follower, followed)
        .await
        .map_err(map_follow_error)?;
    Ok(web::Json(FollowStatus { following }))
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage against mocked ports.
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        MockFavoritesRepository, MockFollowRepository, MockFriendshipRepository,
        MockPasswordHasher, MockShopCatalogue, MockUserAccountRepository, MockUserIconRepository,
        MockUserIdSampler,
    };
    use crate::domain::AccountService;
    use crate::inbound::http::test_utils::test_session_middleware;

    fn state(follows: MockFollowRepository) -> HttpState {
        HttpState {
            accounts: Arc::new(AccountService::new(
                Arc::new(MockUserAccountRepository::new()),
                Arc::new(MockPasswordHasher::new()),
                Arc::new(MockUserIdSampler::new()),
            )),
            favorites: Arc::new(MockFavoritesRepository::new()),
            friendships: Arc::new(MockFriendshipRepository::new()),
            follows: Arc::new(follows),
            shops: Arc::new(MockShopCatalogue::new()),
            icons: Arc::new(MockUserIconRepository::new()),
        }
    }

    async fn app_with_session(
        follows: MockFollowRepository,
    ) -> (
        impl actix_service::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        actix_web::cookie::Cookie<'static>,
    ) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(follows)))
                .wrap(test_session_middleware())
                .route(
                    "/session",
                    web::post().to(|ctx: SessionContext| async move {
                        ctx.persist_user(UserId::new(5).expect("valid id"))
                            .expect("persist");
                        HttpResponse::Ok().finish()
                    }),
                )
                .service(list_follows)
                .service(list_followers)
                .service(follow)
                .service(unfollow)
                .service(follow_status),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/session").to_request(),
        )
        .await;
        let cookie = res
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        (app, cookie)
    }

    #[rstest]
    #[case(FollowRepositoryError::AlreadyFollowing, StatusCode::CONFLICT)]
    #[case(FollowRepositoryError::SelfFollow, StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn follow_maps_store_conflicts(
        #[case] error: FollowRepositoryError,
        #[case] expected: StatusCode,
    ) {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_follow()
            .returning(move |_, _| Err(error.clone()));

        let (app, cookie) = app_with_session(follows).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/users/me/follows")
                .cookie(cookie)
                .set_json(serde_json::json!({ "userId": 9 }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn followed_listings_serialise_profiles() {
        let mut follows = MockFollowRepository::new();
        follows.expect_followed_by().returning(|_| {
            Ok(vec![SocialProfile {
                user_id: UserId::new(9).expect("valid id"),
                user_name: "Hanako".to_owned(),
                photo_address: None,
            }])
        });

        let (app, cookie) = app_with_session(follows).await;
        let body: Vec<serde_json::Value> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/users/me/follows")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["userId"], 9);
        assert_eq!(body[0]["photoAddress"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn follow_status_reports_the_store_answer() {
        let mut follows = MockFollowRepository::new();
        follows
            .expect_is_following()
            .withf(|follower, followed| follower.get() == 5 && followed.get() == 9)
            .returning(|_, _| Ok(false));

        let (app, cookie) = app_with_session(follows).await;
        let body: serde_json::Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/users/me/follows/9")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(body, serde_json::json!({ "following": false }));
    }
}
