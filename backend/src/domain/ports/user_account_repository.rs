//! Port abstraction for account persistence.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{DisplayName, EmailAddress, UserId, UserSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account store adapters.
    pub enum UserAccountRepositoryError {
        /// Another row already owns this email address.
        DuplicateEmail => "this email address is already registered",
        /// Another row already owns this user id.
        DuplicateUserId => "this user id is already taken",
        /// Repository connection could not be established.
        Connection { message: String } => "account store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account store query failed: {message}",
    }
}

/// A credential row fetched for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Profile fields of the matching account.
    pub summary: UserSummary,
    /// Stored password hash for verification.
    pub password_hash: String,
}

/// A fully specified account row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Candidate id issued by the registration flow.
    pub user_id: UserId,
    /// Display name.
    pub user_name: DisplayName,
    /// Login email address.
    pub email: EmailAddress,
    /// Hash of the chosen password.
    pub password_hash: String,
}

/// Store for account rows: credentials, profile fields, existence checks.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// Fetch the credential row whose email or numeric id matches
    /// `login_id`; `None` when no account matches.
    async fn find_credentials(
        &self,
        login_id: &str,
    ) -> Result<Option<CredentialRecord>, UserAccountRepositoryError>;

    /// Insert a new account row.
    ///
    /// Duplicate keys are discriminated:
    /// [`UserAccountRepositoryError::DuplicateUserId`] signals an id
    /// collision the registration loop can retry;
    /// [`UserAccountRepositoryError::DuplicateEmail`] is a terminal
    /// conflict.
    async fn insert_account(&self, account: &NewAccount)
        -> Result<(), UserAccountRepositoryError>;

    /// Whether an account row already owns `user_id`.
    async fn user_id_exists(&self, user_id: UserId) -> Result<bool, UserAccountRepositoryError>;

    /// Whether an account row already owns `email`.
    async fn is_email_taken(&self, email: &str) -> Result<bool, UserAccountRepositoryError>;

    /// Fetch the profile summary for `user_id`.
    async fn find_by_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSummary>, UserAccountRepositoryError>;

    /// Fetch the stored password hash for `user_id`.
    async fn password_hash(
        &self,
        user_id: UserId,
    ) -> Result<Option<String>, UserAccountRepositoryError>;

    /// Update the display name.
    async fn update_username(
        &self,
        user_id: UserId,
        user_name: &DisplayName,
    ) -> Result<(), UserAccountRepositoryError>;

    /// Update the email address. A unique-constraint clash surfaces as
    /// [`UserAccountRepositoryError::DuplicateEmail`].
    async fn update_email(
        &self,
        user_id: UserId,
        email: &EmailAddress,
    ) -> Result<(), UserAccountRepositoryError>;

    /// Update (or clear) the profile photo reference.
    async fn update_profile_photo(
        &self,
        user_id: UserId,
        profile_photo_id: Option<i32>,
    ) -> Result<(), UserAccountRepositoryError>;

    /// Replace the stored password hash.
    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserAccountRepositoryError>;

    /// Partial-match search over display names and email addresses for the
    /// friend-add flow. Results are capped by the adapter.
    async fn search_users(
        &self,
        keyword: &str,
    ) -> Result<Vec<UserSummary>, UserAccountRepositoryError>;
}
