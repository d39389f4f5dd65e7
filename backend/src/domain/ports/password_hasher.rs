//! Port abstraction for the password hashing capability.
//!
//! The domain treats the hash scheme as opaque: it stores and compares
//! strings produced by whatever adapter is wired in.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::define_port_error;

define_port_error! {
    /// Errors raised by hashing adapters.
    pub enum PasswordHashError {
        /// The underlying primitive failed to hash or verify.
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Opaque hash/verify capability for stored credentials.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    async fn hash(&self, plain: &str) -> Result<String, PasswordHashError>;

    /// Verify a plaintext password against a stored hash.
    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordHashError>;
}
