//! Port abstraction for the user↔shop favorites relation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{Shop, ShopId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by favorites store adapters.
    pub enum FavoritesRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "favorites store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "favorites store query failed: {message}",
    }
}

/// Store for the favorites relation.
///
/// Write operations that touch multiple rows run inside one transaction so a
/// partial replacement or half-applied diff is never visible to readers.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Replace the user's entire favorite set with `shop_ids`.
    ///
    /// Idempotent: calling twice with the same set yields the same state.
    async fn sync_favorites(
        &self,
        user_id: UserId,
        shop_ids: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError>;

    /// Apply an incremental change: delete `removed`, then insert `added`
    /// with insert-or-ignore semantics.
    ///
    /// A shop id present in both slices ends up favorited (delete first,
    /// insert second). Empty slices skip their step.
    async fn update_diff(
        &self,
        user_id: UserId,
        added: &[ShopId],
        removed: &[ShopId],
    ) -> Result<(), FavoritesRepositoryError>;

    /// The user's favorite shops, most recently favorited first.
    async fn favorites_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Shop>, FavoritesRepositoryError>;

    /// Remove a single favorite; silently does nothing when absent.
    async fn remove_favorite(
        &self,
        user_id: UserId,
        shop_id: ShopId,
    ) -> Result<(), FavoritesRepositoryError>;
}
