//! MySQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by MySQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`; the pooled guard
//!   returns the connection on every exit path.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   port error types; conflict conditions (duplicate email, existing
//!   friendship or follow edge) keep their identity instead of collapsing
//!   into generic failures.

pub(crate) mod diesel_helpers;
mod diesel_favorites_repository;
mod diesel_follow_repository;
mod diesel_friendship_repository;
mod diesel_shop_catalogue;
mod diesel_user_account_repository;
mod diesel_user_icon_repository;
mod models;
mod pool;
mod schema;

pub use diesel_favorites_repository::DieselFavoritesRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_friendship_repository::DieselFriendshipRepository;
pub use diesel_shop_catalogue::DieselShopCatalogue;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use diesel_user_icon_repository::DieselUserIconRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
