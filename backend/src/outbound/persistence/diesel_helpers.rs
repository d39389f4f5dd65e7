//! Shared helpers for Diesel repository implementations.

use crate::domain::{Shop, ShopId};

use super::models::ShopRow;

/// Convert a catalogue row to the domain shop.
pub(crate) fn row_to_shop(row: ShopRow) -> Shop {
    Shop {
        shop_id: ShopId::new(row.shop_id),
        shop_name: row.shop_name,
        genre: row.genre,
        budget: row.budget,
        distance: row.distance,
        photo_address: row.photo_address,
        address: row.address,
        google_map_link: row.google_map_link,
    }
}
