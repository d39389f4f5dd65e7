//! Profile handlers for the authenticated user.
//!
//! ```text
//! GET /api/v1/users/me
//! PUT /api/v1/users/me/name
//! PUT /api/v1/users/me/email
//! PUT /api/v1/users/me/icon
//! PUT /api/v1/users/me/password
//! GET /api/v1/users/search?q=keyword
//! GET /api/v1/icons/{profile_photo_id}
//! ```

use actix_web::{get, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserIconRepositoryError;
use crate::domain::{DisplayName, EmailAddress, Error, UserSummary};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_user_validation_error;
use crate::inbound::http::ApiResult;

fn map_icon_error(error: UserIconRepositoryError) -> Error {
    match error {
        UserIconRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserIconRepositoryError::Query { message } => Error::internal(message),
    }
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = UserSummary),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account vanished", body = Error)
    ),
    tags = ["account"],
    operation_id = "profile"
)]
#[get("/users/me")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserSummary>> {
    let user_id = session.require_user_id()?;
    let Some(summary) = state.accounts.profile(user_id).await? else {
        return Err(Error::not_found("user not found"));
    };
    Ok(web::Json(summary))
}

/// Body for display-name updates.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNameRequest {
    /// New display name.
    pub user_name: String,
}

/// Update the authenticated user's display name.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/name",
    request_body = UpdateNameRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["account"],
    operation_id = "updateName"
)]
#[put("/users/me/name")]
pub async fn update_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateNameRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user_name = DisplayName::new(payload.into_inner().user_name)
        .map_err(|err| map_user_validation_error("userName", err))?;
    state.accounts.change_username(user_id, &user_name).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body for email updates.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailRequest {
    /// New email address.
    pub email: String,
}

/// Update the authenticated user's email address.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/email",
    request_body = UpdateEmailRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["account"],
    operation_id = "updateEmail"
)]
#[put("/users/me/email")]
pub async fn update_email(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateEmailRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let email = EmailAddress::new(payload.into_inner().email)
        .map_err(|err| map_user_validation_error("email", err))?;
    state.accounts.change_email(user_id, &email).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body for profile icon updates. `profilePhotoId: null` clears the icon.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIconRequest {
    /// New icon reference, or `null` to clear it.
    pub profile_photo_id: Option<i32>,
}

/// Update or clear the authenticated user's profile icon.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/icon",
    request_body = UpdateIconRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["account"],
    operation_id = "updateIcon"
)]
#[put("/users/me/icon")]
pub async fn update_icon(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateIconRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state
        .accounts
        .change_profile_photo(user_id, payload.profile_photo_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body for password changes.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// The password currently on the account.
    pub current_password: String,
    /// The replacement password.
    pub new_password: String,
}

/// Replace the authenticated user's password.
///
/// The current password is verified first; a mismatch is `403`, not a
/// generic failure.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Current password mismatch", body = Error)
    ),
    tags = ["account"],
    operation_id = "updatePassword"
)]
#[put("/users/me/password")]
pub async fn update_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdatePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let body = payload.into_inner();
    if body.new_password.is_empty() {
        return Err(Error::invalid_request("password must not be empty"));
    }

    let changed = state
        .accounts
        .change_password(user_id, &body.current_password, &body.new_password)
        .await?;
    if !changed {
        return Err(Error::forbidden("current password does not match"));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Query string for user search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct UserSearchQuery {
    /// Keyword matched against display names and email addresses.
    pub q: Option<String>,
}

/// Partial-match user search for the friend-add flow.
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = [UserSummary]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["account"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<UserSearchQuery>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    session.require_user_id()?;
    let keyword = query.into_inner().q.unwrap_or_default();
    let results = state.accounts.search_users(&keyword).await?;
    Ok(web::Json(results))
}

/// Response for icon lookups.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IconResponse {
    /// Icon URL, absent when the id is unknown.
    pub photo_address: Option<String>,
}

/// Resolve a profile photo id to its URL.
#[utoipa::path(
    get,
    path = "/api/v1/icons/{profile_photo_id}",
    params(("profile_photo_id" = i32, Path, description = "Icon id from table_user_icon")),
    responses(
        (status = 200, description = "Icon lookup result", body = IconResponse)
    ),
    tags = ["account"],
    operation_id = "iconAddress"
)]
#[get("/icons/{profile_photo_id}")]
pub async fn icon_address(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<IconResponse>> {
    let profile_photo_id = path.into_inner();
    let photo_address = state
        .icons
        .icon_address(profile_photo_id)
        .await
        .map_err(map_icon_error)?;
    Ok(web::Json(IconResponse { photo_address }))
}
