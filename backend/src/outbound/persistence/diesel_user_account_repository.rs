//! MySQL-backed `UserAccountRepository` implementation using Diesel ORM.
//!
//! The login id column double-duty (email or numeric user id) is resolved
//! here: numeric login ids add an `OR user_id = ?` arm to the lookup.
//! Duplicate-key violations are discriminated by the constraint named in
//! the driver message so the registration loop can tell an id collision
//! (retryable) from an email clash (terminal conflict).

use async_trait::async_trait;
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    CredentialRecord, NewAccount, UserAccountRepository, UserAccountRepositoryError,
};
use crate::domain::{DisplayName, EmailAddress, UserId, UserSummary};

use super::models::{NewUserRow, UserProfileRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::table_user;

/// Cap applied to user-search queries.
const SEARCH_LIMIT: i64 = 100;

/// Diesel-backed implementation of the `UserAccountRepository` port.
#[derive(Clone)]
pub struct DieselUserAccountRepository {
    pool: DbPool,
}

impl DieselUserAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain account store errors.
fn map_pool_error(error: PoolError) -> UserAccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserAccountRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain account store errors.
fn map_diesel_error(error: diesel::result::Error) -> UserAccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserAccountRepositoryError::connection("database connection error")
        }
        _ => UserAccountRepositoryError::query("database error"),
    }
}

/// Discriminate a duplicate-key violation by the constraint it names.
///
/// MySQL reports `Duplicate entry '…' for key 'table_user.email'` for the
/// email unique index and `…for key 'table_user.PRIMARY'` for the id.
fn map_duplicate_key(message: &str) -> UserAccountRepositoryError {
    if message.to_lowercase().contains("email") {
        UserAccountRepositoryError::duplicate_email()
    } else {
        UserAccountRepositoryError::duplicate_user_id()
    }
}

/// Map write errors, turning unique violations into duplicate-key variants.
fn map_write_error(error: diesel::result::Error) -> UserAccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            map_duplicate_key(info.message())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_summary(row: UserProfileRow) -> Option<UserSummary> {
    UserId::new(row.user_id).ok().map(|user_id| UserSummary {
        user_id,
        user_name: row.user_name,
        email: row.email,
        profile_photo_id: row.profile_photo_id,
    })
}

fn row_to_credentials(row: UserRow) -> Option<CredentialRecord> {
    UserId::new(row.user_id)
        .ok()
        .map(|user_id| CredentialRecord {
            summary: UserSummary {
                user_id,
                user_name: row.user_name,
                email: row.email,
                profile_photo_id: row.profile_photo_id,
            },
            password_hash: row.password,
        })
}

#[async_trait]
impl UserAccountRepository for DieselUserAccountRepository {
    async fn find_credentials(
        &self,
        login_id: &str,
    ) -> Result<Option<CredentialRecord>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = table_user::table
            .select(UserRow::as_select())
            .into_boxed::<Mysql>();
        query = match login_id.parse::<i32>() {
            Ok(numeric) => query.filter(
                table_user::email
                    .eq(login_id.to_owned())
                    .or(table_user::user_id.eq(numeric)),
            ),
            Err(_) => query.filter(table_user::email.eq(login_id.to_owned())),
        };

        let row: Option<UserRow> = query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.and_then(row_to_credentials))
    }

    async fn insert_account(
        &self,
        account: &NewAccount,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            user_id: account.user_id.get(),
            user_name: account.user_name.as_ref(),
            email: account.email.as_ref(),
            password: account.password_hash.as_str(),
            profile_photo_id: None,
        };
        diesel::insert_into(table_user::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;

        debug!(user_id = %account.user_id, "account created");
        Ok(())
    }

    async fn user_id_exists(
        &self,
        user_id: UserId,
    ) -> Result<bool, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = table_user::table
            .filter(table_user::user_id.eq(user_id.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }

    async fn is_email_taken(&self, email: &str) -> Result<bool, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = table_user::table
            .filter(table_user::email.eq(email.to_owned()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(count > 0)
    }

    async fn find_by_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserSummary>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserProfileRow> = table_user::table
            .filter(table_user::user_id.eq(user_id.get()))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.and_then(row_to_summary))
    }

    async fn password_hash(
        &self,
        user_id: UserId,
    ) -> Result<Option<String>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        table_user::table
            .filter(table_user::user_id.eq(user_id.get()))
            .select(table_user::password)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn update_username(
        &self,
        user_id: UserId,
        user_name: &DisplayName,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(table_user::table.filter(table_user::user_id.eq(user_id.get())))
            .set(table_user::user_name.eq(user_name.as_ref().to_owned()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn update_email(
        &self,
        user_id: UserId,
        email: &EmailAddress,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(table_user::table.filter(table_user::user_id.eq(user_id.get())))
            .set(table_user::email.eq(email.as_ref().to_owned()))
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }

    async fn update_profile_photo(
        &self,
        user_id: UserId,
        profile_photo_id: Option<i32>,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(table_user::table.filter(table_user::user_id.eq(user_id.get())))
            .set(table_user::profile_photo_id.eq(profile_photo_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(table_user::table.filter(table_user::user_id.eq(user_id.get())))
            .set(table_user::password.eq(password_hash.to_owned()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn search_users(
        &self,
        keyword: &str,
    ) -> Result<Vec<UserSummary>, UserAccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let pattern = format!("%{keyword}%");
        let rows: Vec<UserProfileRow> = table_user::table
            .filter(
                table_user::user_name
                    .like(pattern.clone())
                    .or(table_user::email.like(pattern)),
            )
            .limit(SEARCH_LIMIT)
            .select(UserProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().filter_map(row_to_summary).collect())
    }
}
