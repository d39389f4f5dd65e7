//! Port abstraction for profile icon lookups.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::define_port_error;

define_port_error! {
    /// Errors raised by icon store adapters.
    pub enum UserIconRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "icon store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "icon store query failed: {message}",
    }
}

/// Read-only access to the icon table.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserIconRepository: Send + Sync {
    /// Resolve a profile photo id to its URL; `None` when the id is
    /// unknown.
    async fn icon_address(
        &self,
        profile_photo_id: i32,
    ) -> Result<Option<String>, UserIconRepositoryError>;
}
