//! Port abstraction for catalogue searches.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{ShopSearchCriteria, ShopSearchHit};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum ShopCatalogueError {
        /// Repository connection could not be established.
        Connection { message: String } => "shop catalogue connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "shop catalogue query failed: {message}",
    }
}

/// Read-only access to the shop catalogue.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShopCatalogue: Send + Sync {
    /// Execute a filtered catalogue search.
    ///
    /// Returns an empty vector (never an error) when no shop satisfies all
    /// active predicates; criteria with no predicates return the full
    /// catalogue.
    async fn search(
        &self,
        criteria: &ShopSearchCriteria,
    ) -> Result<Vec<ShopSearchHit>, ShopCatalogueError>;
}
