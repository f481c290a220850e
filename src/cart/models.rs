//! Cart Models

use serde::{Deserialize, Serialize};

/// One product quantity within the cart.
///
/// `line_id` is the locally generated key the UI hands out per product screen;
/// it stays stable across quantity edits, so adding the same line again merges
/// quantities instead of duplicating the entry.
///
/// Prices are in minor units (cents). The serialized form uses camelCase keys,
/// matching the snapshot shape the app has always written to device storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub line_id: String,
    pub product_id: String,
    pub store_id: String,
    pub store_name: String,
    pub store_address: String,
    pub store_latitude: f64,
    pub store_longitude: f64,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub image_ref: String,
    pub description: String,
}

impl CartLine {
    /// `unit_price × quantity` for this line alone.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use crate::cart::test_support::line;

    use super::*;

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line("a", "s1", 50, 2).line_total(), 100);
    }

    #[test]
    fn snapshot_round_trips_through_camel_case_json() {
        let original = line("a", "s1", 150, 3);

        let raw = serde_json::to_string(&original).expect("serialize should succeed");

        assert!(raw.contains("\"lineId\""), "expected camelCase keys, got {raw}");
        assert!(raw.contains("\"unitPrice\""), "expected camelCase keys, got {raw}");

        let parsed: CartLine = serde_json::from_str(&raw).expect("deserialize should succeed");

        assert_eq!(parsed, original);
    }
}
