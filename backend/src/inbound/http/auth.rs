//! Session authentication handlers.
//!
//! ```text
//! POST /api/v1/login    {"loginId":"taro@example.com","password":"secret"}
//! POST /api/v1/logout
//! POST /api/v1/register {"userName":"Taro","email":"taro@example.com","password":"secret"}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DisplayName, EmailAddress, Error, LoginCredentials, RegistrationRequest, UserId, UserSummary,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_login_validation_error, map_user_validation_error};
use crate::inbound::http::ApiResult;

/// Login request body for `POST /api/v1/login`.
///
/// The login id is an email address or a numeric user id.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address or numeric user id.
    pub login_id: String,
    /// Plaintext password.
    pub password: String,
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSummary,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserSummary>> {
    let credentials = LoginCredentials::try_from_parts(&payload.login_id, &payload.password)
        .map_err(map_login_validation_error)?;

    let Some(summary) = state.accounts.authenticate(&credentials).await? else {
        return Err(Error::unauthorized("invalid credentials"));
    };

    session.persist_user(summary.user_id)?;
    Ok(web::Json(summary))
}

/// Drop the caller's session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub user_name: String,
    /// Login email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Response carrying the issued user id.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// The eight-digit id issued to the new account.
    pub user_id: UserId,
}

/// Register a new account and log it in.
///
/// Issues a collision-checked random eight-digit user id; an exhausted id
/// space is reported as `503`, distinct from validation and conflict
/// failures.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Id issuance exhausted", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let user_name = DisplayName::new(body.user_name)
        .map_err(|err| map_user_validation_error("userName", err))?;
    let email =
        EmailAddress::new(body.email).map_err(|err| map_user_validation_error("email", err))?;
    let request = RegistrationRequest::new(user_name, email, &body.password)
        .map_err(map_login_validation_error)?;

    let user_id = state.accounts.register(request).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Created().json(RegisterResponse { user_id }))
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
        CredentialRecord, MockFavoritesRepository, MockFollowRepository,
        MockFriendshipRepository, MockPasswordHasher, MockShopCatalogue,
        MockUserAccountRepository, MockUserIconRepository, MockUserIdSampler,
    };
    use crate::domain::AccountService;
    use crate::inbound::http::test_utils::test_session_middleware;

    fn summary() -> UserSummary {
        UserSummary {
            user_id: UserId::new(10_000_001).expect("valid id"),
            user_name: "Taro".to_owned(),
            email: "taro@example.com".to_owned(),
            profile_photo_id: None,
        }
    }

    fn state_with_accounts(
        accounts: MockUserAccountRepository,
        hasher: MockPasswordHasher,
    ) -> HttpState {
        HttpState {
            accounts: Arc::new(AccountService::new(
                Arc::new(accounts),
                Arc::new(hasher),
                Arc::new(MockUserIdSampler::new()),
            )),
            favorites: Arc::new(MockFavoritesRepository::new()),
            friendships: Arc::new(MockFriendshipRepository::new()),
            follows: Arc::new(MockFollowRepository::new()),
            shops: Arc::new(MockShopCatalogue::new()),
            icons: Arc::new(MockUserIconRepository::new()),
        }
    }

    async fn post_login(state: HttpState, body: serde_json::Value) -> StatusCode {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(test_session_middleware())
                .service(login),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await.status()
    }

    #[rstest]
    #[case(true, StatusCode::OK)]
    #[case(false, StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn login_maps_verification_to_status(
        #[case] verified: bool,
        #[case] expected: StatusCode,
    ) {
        let mut accounts = MockUserAccountRepository::new();
        accounts.expect_find_credentials().returning(|_| {
            Ok(Some(CredentialRecord {
                summary: summary(),
                password_hash: "$hash$".to_owned(),
            }))
        });
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().returning(move |_, _| Ok(verified));

        let status = post_login(
            state_with_accounts(accounts, hasher),
            serde_json::json!({ "loginId": "taro@example.com", "password": "secret" }),
        )
        .await;

        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn login_rejects_blank_credentials_before_the_store() {
        let mut accounts = MockUserAccountRepository::new();
        accounts.expect_find_credentials().never();
        let hasher = MockPasswordHasher::new();

        let status = post_login(
            state_with_accounts(accounts, hasher),
            serde_json::json!({ "loginId": "  ", "password": "secret" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_reports_conflicts_as_409() {
        let mut accounts = MockUserAccountRepository::new();
        accounts.expect_is_email_taken().returning(|_| Ok(true));
        let hasher = MockPasswordHasher::new();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with_accounts(accounts, hasher)))
                .wrap(test_session_middleware())
                .service(register),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(serde_json::json!({
                "userName": "Taro",
                "email": "taro@example.com",
                "password": "secret"
            }))
            .to_request();

        let status = test::call_service(&app, req).await.status();
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
