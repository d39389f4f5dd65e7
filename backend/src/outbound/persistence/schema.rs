//! Diesel table definitions for the MySQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts.
    ///
    /// The `user_id` column is an application-issued eight-digit integer,
    /// not an auto-increment surrogate.
    table_user (user_id) {
        /// Primary key issued by the registration flow.
        user_id -> Integer,
        /// Display name.
        user_name -> Varchar,
        /// Login email address (unique).
        email -> Varchar,
        /// Password hash.
        password -> Varchar,
        /// Optional reference into `table_user_icon`.
        profile_photo_id -> Nullable<Integer>,
    }
}

diesel::table! {
    /// Selectable profile icons.
    table_user_icon (profile_photo_id) {
        /// Primary key referenced from `table_user`.
        profile_photo_id -> Integer,
        /// Icon URL.
        photo_address -> Varchar,
    }
}

diesel::table! {
    /// Read-only shop catalogue.
    table_shop (shop_id) {
        /// Primary key.
        shop_id -> Integer,
        /// Shop display name.
        shop_name -> Varchar,
        /// Single category tag.
        genre -> Varchar,
        /// Typical budget in integer currency units.
        budget -> Integer,
        /// Distance from the reference point in metres.
        distance -> Integer,
        /// Photo URL.
        photo_address -> Varchar,
        /// Street address.
        address -> Varchar,
        /// Map link.
        google_map_link -> Varchar,
    }
}

diesel::table! {
    /// User↔shop favorites.
    ///
    /// `surrogate_key` is auto-increment and exists purely so listings can
    /// order by most-recently-favorited; `(user_id, shop_id)` carries the
    /// unique constraint.
    table_favorite (surrogate_key) {
        /// Monotonic ordering key.
        surrogate_key -> Bigint,
        /// Owning user.
        user_id -> Integer,
        /// Favorited shop.
        shop_id -> Integer,
    }
}

diesel::table! {
    /// Symmetric friendships stored as canonically ordered pairs.
    ///
    /// The migration enforces `user_id_small < user_id_large`, which also
    /// rules out self-friendship at the storage layer.
    friendship (user_id_small, user_id_large) {
        /// The lower of the two user ids.
        user_id_small -> Integer,
        /// The higher of the two user ids.
        user_id_large -> Integer,
    }
}

diesel::table! {
    /// Directed follow edges.
    relationship (follower_id, followed_id) {
        /// The user doing the following.
        follower_id -> Integer,
        /// The user being followed.
        followed_id -> Integer,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    table_user,
    table_user_icon,
    table_shop,
    table_favorite,
    friendship,
    relationship,
);
