//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, LoginValidationError, UserValidationError};

/// Build an `invalid_request` error carrying the offending field name.
pub(crate) fn field_error(field: &str, message: impl std::fmt::Display) -> Error {
    Error::invalid_request(message.to_string()).with_details(json!({ "field": field }))
}

/// Map a user newtype validation failure onto the named request field.
pub(crate) fn map_user_validation_error(field: &str, err: UserValidationError) -> Error {
    field_error(field, err)
}

/// Map a credentials validation failure onto its request field.
pub(crate) fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyLoginId => field_error("loginId", err),
        LoginValidationError::EmptyPassword => field_error("password", err),
    }
}
