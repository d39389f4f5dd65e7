//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and the account service, and remain testable
//! without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FavoritesRepository, FollowRepository, FriendshipRepository, ShopCatalogue,
    UserIconRepository,
};
use crate::domain::AccountService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account use-cases (login, registration, profile updates).
    pub accounts: Arc<AccountService>,
    /// Favorites store.
    pub favorites: Arc<dyn FavoritesRepository>,
    /// Friendship store.
    pub friendships: Arc<dyn FriendshipRepository>,
    /// Follow store.
    pub follows: Arc<dyn FollowRepository>,
    /// Shop catalogue.
    pub shops: Arc<dyn ShopCatalogue>,
    /// Icon lookups.
    pub icons: Arc<dyn UserIconRepository>,
}
