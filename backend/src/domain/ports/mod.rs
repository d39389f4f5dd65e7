//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database stores, the password hashing primitive, the id source). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

mod macros;
pub(crate) use macros::define_port_error;

mod favorites_repository;
mod follow_repository;
mod friendship_repository;
mod password_hasher;
mod shop_catalogue;
mod user_account_repository;
mod user_icon_repository;
mod user_id_sampler;

#[cfg(test)]
pub use favorites_repository::MockFavoritesRepository;
pub use favorites_repository::{FavoritesRepository, FavoritesRepositoryError};
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use friendship_repository::MockFriendshipRepository;
pub use friendship_repository::{FriendshipRepository, FriendshipRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use shop_catalogue::MockShopCatalogue;
pub use shop_catalogue::{ShopCatalogue, ShopCatalogueError};
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{
    CredentialRecord, NewAccount, UserAccountRepository, UserAccountRepositoryError,
};
#[cfg(test)]
pub use user_icon_repository::MockUserIconRepository;
pub use user_icon_repository::{UserIconRepository, UserIconRepositoryError};
#[cfg(test)]
pub use user_id_sampler::MockUserIdSampler;
pub use user_id_sampler::{ThreadRngUserIdSampler, UserIdSampler};
