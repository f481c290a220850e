//! Shared cart fixtures for unit tests.

use super::models::CartLine;

/// A fully populated line for `store_id` with the given price and quantity.
pub(crate) fn line(line_id: &str, store_id: &str, unit_price: u64, quantity: u32) -> CartLine {
    CartLine {
        line_id: line_id.to_string(),
        product_id: format!("prod-{line_id}"),
        store_id: store_id.to_string(),
        store_name: format!("Store {store_id}"),
        store_address: "123 Example Road".to_string(),
        store_latitude: 25.0478,
        store_longitude: 121.5319,
        name: "Surprise bag".to_string(),
        unit_price,
        quantity,
        image_ref: "https://example.test/bag.png".to_string(),
        description: "Whatever is left at closing".to_string(),
    }
}
