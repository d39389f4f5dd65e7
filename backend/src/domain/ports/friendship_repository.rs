//! Port abstraction for the symmetric friendship relation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by friendship store adapters.
    pub enum FriendshipRepositoryError {
        /// Both sides of the pair are the same user; rejected before SQL.
        SelfFriendship => "users cannot befriend themselves",
        /// The canonical pair already has a row.
        AlreadyFriends => "these users are already friends",
        /// Repository connection could not be established.
        Connection { message: String } => "friendship store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "friendship store query failed: {message}",
    }
}

/// Store for the symmetric friendship relation.
///
/// Implementations canonicalize every `(a, b)` argument pair through
/// [`crate::domain::FriendPair`] before touching storage, so callers may
/// pass ids in either order.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Record a friendship. A duplicate pair is surfaced as
    /// [`FriendshipRepositoryError::AlreadyFriends`], never swallowed.
    async fn create_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError>;

    /// Delete a friendship; does nothing when the pair is absent.
    async fn delete_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<(), FriendshipRepositoryError>;

    /// Whether the two users are friends.
    ///
    /// `a == b` answers `false` without touching storage: an existence
    /// check is a safe query, not an invariant violation.
    async fn friendship_exists(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<bool, FriendshipRepositoryError>;

    /// Counterpart ids of every friendship containing `user_id`.
    async fn friends_of(&self, user_id: UserId)
        -> Result<Vec<UserId>, FriendshipRepositoryError>;
}
