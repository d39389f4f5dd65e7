//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Smallest id the registration flow will issue.
pub const GENERATED_ID_MIN: i32 = 10_000_000;
/// Largest id the registration flow will issue.
pub const GENERATED_ID_MAX: i32 = 99_999_999;

/// Validation errors returned by the user newtypes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// User id must be a positive integer.
    NonPositiveId,
    /// Display name was missing or blank once trimmed.
    EmptyDisplayName,
    /// Display name exceeds the storage column width.
    DisplayNameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
    /// Email address was missing or blank once trimmed.
    EmptyEmail,
    /// Email address is not of the shape `local@domain`.
    InvalidEmail,
    /// Email address exceeds the storage column width.
    EmailTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email address must not be empty"),
            Self::InvalidEmail => write!(f, "email address must look like local@domain"),
            Self::EmailTooLong { max } => {
                write!(f, "email address must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier issued by the application.
///
/// Ids are positive integers; ids issued by the registration flow fall in
/// the eight-digit range [`GENERATED_ID_MIN`]..=[`GENERATED_ID_MAX`], but
/// pre-existing rows may carry any positive id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct UserId(i32);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub const fn new(raw: i32) -> Result<Self, UserValidationError> {
        if raw <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    /// Access the raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from owned input.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(display_name.into())
    }

    fn from_owned(display_name: String) -> Result<Self, UserValidationError> {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        let DisplayName(raw) = value;
        raw
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Unique login email address.
///
/// ## Invariants
/// - Trimmed, non-empty, and shaped like `local@domain` (one `@`, non-empty
///   sides). Full RFC validation is left to the mail system; the database
///   carries the uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 255;

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`] from owned input.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let mut parts = trimmed.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        let EmailAddress(raw) = value;
        raw
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Account read model handed to handlers after lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Display name shown next to the user's content.
    pub user_name: String,
    /// Login email address.
    pub email: String,
    /// Reference into the icon table, when the user picked one.
    pub profile_photo_id: Option<i32>,
}

/// Counterpart read model for follower/followed listings.
///
/// The icon address is resolved at query time; users who never picked an
/// icon still appear, with `photo_address` absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfile {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Display name shown next to the user's content.
    pub user_name: String,
    /// Resolved icon URL, when one is set.
    pub photo_address: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(GENERATED_ID_MIN)]
    #[case(GENERATED_ID_MAX)]
    fn user_id_accepts_positive_values(#[case] raw: i32) {
        let id = UserId::new(raw).expect("positive ids are valid");
        assert_eq!(id.get(), raw);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn user_id_rejects_non_positive_values(#[case] raw: i32) {
        assert_eq!(
            UserId::new(raw).expect_err("non-positive ids must fail"),
            UserValidationError::NonPositiveId
        );
    }

    #[rstest]
    #[case("  Taro  ", "Taro")]
    #[case("Ada Lovelace", "Ada Lovelace")]
    fn display_name_trims_whitespace(#[case] input: &str, #[case] expected: &str) {
        let name = DisplayName::new(input).expect("valid display name");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    fn display_name_rejects_blank_input() {
        assert_eq!(
            DisplayName::new("   ").expect_err("blank names must fail"),
            UserValidationError::EmptyDisplayName
        );
    }

    #[rstest]
    #[case("taro@example.com")]
    #[case("  padded@example.com  ")]
    fn email_accepts_local_at_domain(#[case] input: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_ref(), input.trim());
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@missing-local")]
    #[case("missing-domain@")]
    #[case("two@at@signs")]
    fn email_rejects_malformed_input(#[case] input: &str) {
        assert!(EmailAddress::new(input).is_err());
    }
}
