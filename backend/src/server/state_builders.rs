//! Builders wiring repository adapters into the HTTP state bundle.

use std::sync::Arc;

use crate::domain::ports::ThreadRngUserIdSampler;
use crate::domain::AccountService;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselFavoritesRepository, DieselFollowRepository, DieselFriendshipRepository,
    DieselShopCatalogue, DieselUserAccountRepository, DieselUserIconRepository,
};
use crate::outbound::security::BcryptPasswordHasher;

/// Build the HTTP state over database-backed adapters.
pub fn build_http_state(pool: &DbPool) -> HttpState {
    let accounts = AccountService::new(
        Arc::new(DieselUserAccountRepository::new(pool.clone())),
        Arc::new(BcryptPasswordHasher::new()),
        Arc::new(ThreadRngUserIdSampler),
    );

    HttpState {
        accounts: Arc::new(accounts),
        favorites: Arc::new(DieselFavoritesRepository::new(pool.clone())),
        friendships: Arc::new(DieselFriendshipRepository::new(pool.clone())),
        follows: Arc::new(DieselFollowRepository::new(pool.clone())),
        shops: Arc::new(DieselShopCatalogue::new(pool.clone())),
        icons: Arc::new(DieselUserIconRepository::new(pool.clone())),
    }
}
