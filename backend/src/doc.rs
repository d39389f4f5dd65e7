//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers every HTTP endpoint from the
//! inbound layer plus the schemas their bodies reference, and the session
//! cookie security scheme. The generated specification backs Swagger UI in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "tabemap backend API",
        description = "Session-authenticated restaurant finder: shop search, \
                       favorites, and the friend/follow social graph."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::account::profile,
        crate::inbound::http::account::update_name,
        crate::inbound::http::account::update_email,
        crate::inbound::http::account::update_icon,
        crate::inbound::http::account::update_password,
        crate::inbound::http::account::search_users,
        crate::inbound::http::account::icon_address,
        crate::inbound::http::shops::search_shops,
        crate::inbound::http::favorites::list_favorites,
        crate::inbound::http::favorites::replace_favorites,
        crate::inbound::http::favorites::patch_favorites,
        crate::inbound::http::favorites::remove_favorite,
        crate::inbound::http::friends::list_friends,
        crate::inbound::http::friends::add_friend,
        crate::inbound::http::friends::remove_friend,
        crate::inbound::http::friends::friendship_status,
        crate::inbound::http::follows::list_follows,
        crate::inbound::http::follows::list_followers,
        crate::inbound::http::follows::follow,
        crate::inbound::http::follows::unfollow,
        crate::inbound::http::follows::follow_status,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::domain::UserId,
        crate::domain::UserSummary,
        crate::domain::SocialProfile,
        crate::domain::Shop,
        crate::domain::ShopId,
        crate::domain::ShopSearchHit,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::auth::RegisterRequest,
        crate::inbound::http::auth::RegisterResponse,
        crate::inbound::http::account::UpdateNameRequest,
        crate::inbound::http::account::UpdateEmailRequest,
        crate::inbound::http::account::UpdateIconRequest,
        crate::inbound::http::account::UpdatePasswordRequest,
        crate::inbound::http::account::IconResponse,
        crate::inbound::http::favorites::ReplaceFavoritesRequest,
        crate::inbound::http::favorites::FavoritesDiffRequest,
        crate::inbound::http::friends::FriendRequest,
        crate::inbound::http::friends::FriendshipStatus,
        crate::inbound::http::follows::FollowRequest,
        crate::inbound::http::follows::FollowStatus,
    )),
    tags(
        (name = "auth", description = "Login, logout and registration"),
        (name = "account", description = "Profile management"),
        (name = "shops", description = "Catalogue search"),
        (name = "favorites", description = "Favorite shops"),
        (name = "friends", description = "Symmetric friendships"),
        (name = "follows", description = "Directed follow graph"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_builds_and_carries_the_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components present");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }

    #[test]
    fn document_lists_the_core_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/login",
            "/api/v1/shops",
            "/api/v1/users/me/favorites",
            "/api/v1/users/me/friends",
            "/api/v1/users/me/follows",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path: {path}");
        }
    }
}
