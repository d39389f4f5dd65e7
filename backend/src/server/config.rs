//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::inbound::http::state::HttpState;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) state: HttpState,
}

impl ServerConfig {
    /// Construct a server configuration around a prepared state bundle.
    #[must_use]
    pub fn new(key: Key, bind_addr: SocketAddr, state: HttpState) -> Self {
        Self {
            key,
            cookie_secure: true,
            same_site: SameSite::Lax,
            bind_addr,
            state,
        }
    }

    /// Allow the session cookie over plain HTTP (development only).
    #[must_use]
    pub fn with_cookie_secure(mut self, cookie_secure: bool) -> Self {
        self.cookie_secure = cookie_secure;
        self
    }

    /// Override the session cookie's SameSite policy.
    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
