//! Bcrypt-backed `PasswordHasher` adapter.
//!
//! Bcrypt work factors are deliberately slow, so both operations run on the
//! blocking thread pool instead of stalling the async executor.

use async_trait::async_trait;
use bcrypt::DEFAULT_COST;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Production hashing adapter over the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Create a hasher with bcrypt's default cost.
    pub const fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with an explicit cost (useful to speed up tests).
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plain: &str) -> Result<String, PasswordHashError> {
        let plain = plain.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|err| PasswordHashError::hash(format!("hashing task failed: {err}")))?
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .map_err(|err| PasswordHashError::hash(format!("verification task failed: {err}")))?
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    // Minimum bcrypt cost keeps these tests fast while exercising the real
    // primitive.
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);

        let hash = hasher.hash("secret").await.expect("hashing succeeds");
        assert!(hasher
            .verify("secret", &hash)
            .await
            .expect("verification succeeds"));
        assert!(!hasher
            .verify("not-the-secret", &hash)
            .await
            .expect("verification succeeds"));
    }

    #[tokio::test]
    async fn each_hash_gets_a_fresh_salt() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);

        let first = hasher.hash("secret").await.expect("hashing succeeds");
        let second = hasher.hash("secret").await.expect("hashing succeeds");

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hashes_surface_as_hash_errors() {
        let hasher = BcryptPasswordHasher::with_cost(TEST_COST);

        let err = hasher
            .verify("secret", "not-a-bcrypt-hash")
            .await
            .expect_err("malformed hash must fail");

        assert!(matches!(err, PasswordHashError::Hash { .. }));
    }
}
