//! Account use-cases: authentication, registration, profile updates.
//!
//! The service owns the credential flows so HTTP handlers stay thin and the
//! stores stay mechanical. Registration issues ids through a bounded
//! generate→check→insert loop: each round draws a random eight-digit
//! candidate, re-checks existence, and absorbs insert-time collisions from
//! concurrent registrations; running out of attempts is reported as a
//! capacity failure distinct from generic storage errors.

use std::sync::Arc;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::auth::{LoginCredentials, LoginValidationError};
use super::error::Error;
use super::ports::{
    NewAccount, PasswordHashError, PasswordHasher, UserAccountRepository,
    UserAccountRepositoryError, UserIdSampler,
};
use super::user::{DisplayName, EmailAddress, UserId, UserSummary};

/// Upper bound on id issuance rounds before registration gives up.
const MAX_ID_ATTEMPTS: u32 = 5;

/// Cap applied to user-search results.
const USER_SEARCH_LIMIT: usize = 100;

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    user_name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationRequest {
    /// Bundle validated fields with a non-empty password.
    pub fn new(
        user_name: DisplayName,
        email: EmailAddress,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            user_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }
}

/// Account use-case service over the persistence and hashing ports.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn UserAccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    ids: Arc<dyn UserIdSampler>,
}

fn map_account_error(error: UserAccountRepositoryError) -> Error {
    match error {
        UserAccountRepositoryError::DuplicateEmail => {
            Error::conflict("this email address is already registered")
        }
        UserAccountRepositoryError::DuplicateUserId => {
            Error::conflict("this user id is already taken")
        }
        UserAccountRepositoryError::Connection { message } => Error::service_unavailable(message),
        UserAccountRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    let PasswordHashError::Hash { message } = error;
    Error::internal(message)
}

impl AccountService {
    /// Create a service over the given ports.
    pub fn new(
        accounts: Arc<dyn UserAccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        ids: Arc<dyn UserIdSampler>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            ids,
        }
    }

    /// Verify credentials; `None` for unknown login ids and for password
    /// mismatches alike, so callers cannot distinguish the two.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<UserSummary>, Error> {
        let Some(record) = self
            .accounts
            .find_credentials(credentials.login_id())
            .await
            .map_err(map_account_error)?
        else {
            debug!(login_id = credentials.login_id(), "login id not found");
            return Ok(None);
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .await
            .map_err(map_hash_error)?;

        Ok(matches.then_some(record.summary))
    }

    /// Register a new account and return the issued user id.
    pub async fn register(&self, request: RegistrationRequest) -> Result<UserId, Error> {
        if self
            .accounts
            .is_email_taken(request.email.as_ref())
            .await
            .map_err(map_account_error)?
        {
            return Err(Error::conflict("this email address is already registered"));
        }

        let password_hash = self
            .hasher
            .hash(request.password.as_str())
            .await
            .map_err(map_hash_error)?;

        for attempt in 0..MAX_ID_ATTEMPTS {
            let candidate = UserId::new(self.ids.sample())
                .map_err(|err| Error::internal(format!("id sampler out of range: {err}")))?;

            if self
                .accounts
                .user_id_exists(candidate)
                .await
                .map_err(map_account_error)?
            {
                debug!(%candidate, attempt, "candidate id already taken, resampling");
                continue;
            }

            let account = NewAccount {
                user_id: candidate,
                user_name: request.user_name.clone(),
                email: request.email.clone(),
                password_hash: password_hash.clone(),
            };

            match self.accounts.insert_account(&account).await {
                Ok(()) => return Ok(candidate),
                // Lost the race against a concurrent registration; the next
                // round draws a fresh candidate.
                Err(UserAccountRepositoryError::DuplicateUserId) => {
                    debug!(%candidate, attempt, "candidate id collided on insert, resampling");
                }
                Err(UserAccountRepositoryError::DuplicateEmail) => {
                    return Err(Error::conflict("this email address is already registered"));
                }
                Err(other) => return Err(map_account_error(other)),
            }
        }

        warn!(attempts = MAX_ID_ATTEMPTS, "user id issuance exhausted");
        Err(Error::service_unavailable(
            "could not issue a unique user id, please try again",
        ))
    }

    /// Fetch the profile summary for `user_id`.
    pub async fn profile(&self, user_id: UserId) -> Result<Option<UserSummary>, Error> {
        self.accounts
            .find_by_id(user_id)
            .await
            .map_err(map_account_error)
    }

    /// Update the display name.
    pub async fn change_username(
        &self,
        user_id: UserId,
        user_name: &DisplayName,
    ) -> Result<(), Error> {
        self.accounts
            .update_username(user_id, user_name)
            .await
            .map_err(map_account_error)
    }

    /// Update the email address: precondition check plus the store's
    /// unique-constraint backstop.
    pub async fn change_email(&self, user_id: UserId, email: &EmailAddress) -> Result<(), Error> {
        if self
            .accounts
            .is_email_taken(email.as_ref())
            .await
            .map_err(map_account_error)?
        {
            return Err(Error::conflict("this email address is already registered"));
        }
        self.accounts
            .update_email(user_id, email)
            .await
            .map_err(map_account_error)
    }

    /// Update (or clear) the profile photo reference.
    pub async fn change_profile_photo(
        &self,
        user_id: UserId,
        profile_photo_id: Option<i32>,
    ) -> Result<(), Error> {
        self.accounts
            .update_profile_photo(user_id, profile_photo_id)
            .await
            .map_err(map_account_error)
    }

    /// Replace the password after verifying the current one.
    ///
    /// A mismatching current password is a clean `Ok(false)`, not an error;
    /// an unknown user id is `NotFound`.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, Error> {
        let Some(stored_hash) = self
            .accounts
            .password_hash(user_id)
            .await
            .map_err(map_account_error)?
        else {
            return Err(Error::not_found("user not found"));
        };

        if !self
            .hasher
            .verify(current_password, &stored_hash)
            .await
            .map_err(map_hash_error)?
        {
            return Ok(false);
        }

        let new_hash = self
            .hasher
            .hash(new_password)
            .await
            .map_err(map_hash_error)?;
        self.accounts
            .update_password_hash(user_id, &new_hash)
            .await
            .map_err(map_account_error)?;
        Ok(true)
    }

    /// Partial-match user search for the friend-add flow.
    ///
    /// A blank keyword short-circuits to an empty list without touching
    /// storage.
    pub async fn search_users(&self, keyword: &str) -> Result<Vec<UserSummary>, Error> {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let mut results = self
            .accounts
            .search_users(trimmed)
            .await
            .map_err(map_account_error)?;
        results.truncate(USER_SEARCH_LIMIT);
        Ok(results)
    }
}
