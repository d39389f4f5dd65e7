//! Port abstraction for the directed follow relation.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{SocialProfile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow store adapters.
    pub enum FollowRepositoryError {
        /// Follower and followed are the same user; rejected before SQL.
        SelfFollow => "users cannot follow themselves",
        /// The directed edge already exists.
        AlreadyFollowing => "this user is already being followed",
        /// Repository connection could not be established.
        Connection { message: String } => "follow store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow store query failed: {message}",
    }
}

/// Store for the directed follow graph, independent of friendships.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Record a follower → followed edge.
    ///
    /// Re-following is rejected as
    /// [`FollowRepositoryError::AlreadyFollowing`] via the unique pair
    /// constraint.
    async fn follow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError>;

    /// Remove the edge; does nothing when absent.
    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<(), FollowRepositoryError>;

    /// Users that `follower` follows.
    async fn followed_by(
        &self,
        follower: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError>;

    /// Users following `followed`.
    async fn followers_of(
        &self,
        followed: UserId,
    ) -> Result<Vec<SocialProfile>, FollowRepositoryError>;

    /// Whether the edge exists. A self-query answers `false` without
    /// touching storage.
    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, FollowRepositoryError>;
}
