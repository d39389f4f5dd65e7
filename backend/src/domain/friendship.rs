//! Canonical friendship pair.
//!
//! A friendship between two users is undirected; storage keeps a single row
//! per unordered pair by always ordering the two ids. Every read and write
//! goes through [`FriendPair`] so a friendship between X and Y is stored and
//! queried identically regardless of which side initiates.

use std::fmt;

use super::user::UserId;

/// Validation errors returned by [`FriendPair::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipValidationError {
    /// Both sides of the pair are the same user.
    SelfFriendship,
}

impl fmt::Display for FriendshipValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfFriendship => write!(f, "users cannot befriend themselves"),
        }
    }
}

impl std::error::Error for FriendshipValidationError {}

/// Canonically ordered friendship pair: `small < large` always holds.
///
/// Rejecting `a == b` here keeps the no-self-friend invariant in the
/// application even when the database constraint is missing or weak.
///
/// # Examples
/// ```
/// use tabemap_backend::domain::{FriendPair, UserId};
///
/// let a = UserId::new(42).unwrap();
/// let b = UserId::new(7).unwrap();
/// let pair = FriendPair::new(a, b).unwrap();
/// assert_eq!(pair.small(), b);
/// assert_eq!(pair.large(), a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FriendPair {
    small: UserId,
    large: UserId,
}

impl FriendPair {
    /// Canonicalize two user ids into an ordered pair.
    pub fn new(a: UserId, b: UserId) -> Result<Self, FriendshipValidationError> {
        if a == b {
            return Err(FriendshipValidationError::SelfFriendship);
        }
        Ok(Self {
            small: a.min(b),
            large: a.max(b),
        })
    }

    /// The lower of the two ids.
    pub const fn small(self) -> UserId {
        self.small
    }

    /// The higher of the two ids.
    pub const fn large(self) -> UserId {
        self.large
    }

    /// The stored id that is not `user_id`, if the pair contains `user_id`.
    pub fn counterpart_of(self, user_id: UserId) -> Option<UserId> {
        if self.small == user_id {
            Some(self.large)
        } else if self.large == user_id {
            Some(self.small)
        } else {
            None
        }
    }
}
