//! Domain primitives and aggregates.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — transport-agnostic error payload.
//! - `UserId`, `DisplayName`, `EmailAddress`, `UserSummary`, `SocialProfile`
//!   — user identity and read models.
//! - `LoginCredentials` — validated login payload.
//! - `FriendPair` — canonical unordered friendship pair.
//! - `Shop`, `ShopId`, `ShopSearchCriteria`, `DistanceBand` — catalogue
//!   read model and search filters.
//! - `AccountService` — registration/authentication use-cases over ports.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod friendship;
pub mod ports;
pub mod shop;
pub mod user;

pub use self::account_service::{AccountService, RegistrationRequest};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::friendship::{FriendPair, FriendshipValidationError};
pub use self::shop::{
    DistanceBand, Shop, ShopId, ShopSearchCriteria, ShopSearchHit, BUDGET_BUFFER,
};
pub use self::user::{
    DisplayName, EmailAddress, SocialProfile, UserId, UserSummary, UserValidationError,
    GENERATED_ID_MAX, GENERATED_ID_MIN,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tabemap_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
