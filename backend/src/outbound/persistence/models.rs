//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;

use super::schema::{friendship, relationship, table_favorite, table_shop, table_user};

/// Row struct for reading account rows with credentials.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = table_user)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub(crate) struct UserRow {
    pub user_id: i32,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub profile_photo_id: Option<i32>,
}

/// Row struct for reading profile fields without the password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = table_user)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub(crate) struct UserProfileRow {
    pub user_id: i32,
    pub user_name: String,
    pub email: String,
    pub profile_photo_id: Option<i32>,
}

/// Insertable struct for creating new account rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = table_user)]
pub(crate) struct NewUserRow<'a> {
    pub user_id: i32,
    pub user_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub profile_photo_id: Option<i32>,
}

/// Row struct for reading catalogue entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = table_shop)]
#[diesel(check_for_backend(diesel::mysql::Mysql))]
pub(crate) struct ShopRow {
    pub shop_id: i32,
    pub shop_name: String,
    pub genre: String,
    pub budget: i32,
    pub distance: i32,
    pub photo_address: String,
    pub address: String,
    pub google_map_link: String,
}

/// Insertable struct for favorite rows; the surrogate key is assigned by
/// the database.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = table_favorite)]
pub(crate) struct NewFavoriteRow {
    pub user_id: i32,
    pub shop_id: i32,
}

/// Insertable struct for canonical friendship pairs.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = friendship)]
pub(crate) struct NewFriendshipRow {
    pub user_id_small: i32,
    pub user_id_large: i32,
}

/// Insertable struct for directed follow edges.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = relationship)]
pub(crate) struct NewRelationshipRow {
    pub follower_id: i32,
    pub followed_id: i32,
}
