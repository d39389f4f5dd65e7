//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::build_http_state;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::inbound::http::{account, auth, favorites, follows, friends, shops};
use crate::Trace;
#[cfg(debug_assertions)]
use crate::ApiDoc;

/// Build and start the HTTP server; the returned handle resolves when the
/// server shuts down.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        state,
    } = config;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::register)
            .service(account::profile)
            .service(account::update_name)
            .service(account::update_email)
            .service(account::update_icon)
            .service(account::update_password)
            .service(account::search_users)
            .service(account::icon_address)
            .service(shops::search_shops)
            .service(favorites::list_favorites)
            .service(favorites::replace_favorites)
            .service(favorites::patch_favorites)
            .service(favorites::remove_favorite)
            .service(friends::list_friends)
            .service(friends::add_friend)
            .service(friends::remove_friend)
            .service(friends::friendship_status)
            .service(follows::list_follows)
            .service(follows::list_followers)
            .service(follows::follow)
            .service(follows::unfollow)
            .service(follows::follow_status);

        let app = App::new().app_data(state.clone()).wrap(Trace).service(api);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?;

    Ok(server.run())
}
