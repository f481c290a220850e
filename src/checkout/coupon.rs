//! Coupons

use serde::{Deserialize, Serialize};

/// A discount descriptor from the coupon catalog.
///
/// Selected transiently per checkout session; only the computed discount
/// amount outlives the session. `discount_rate` is a fraction in `[0, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub label: String,
    pub minimum_subtotal: u64,
    pub discount_rate: f64,
}

impl Coupon {
    /// Whether this coupon may be applied to the given whole-cart subtotal.
    #[must_use]
    pub fn applicable(&self, subtotal: u64) -> bool {
        subtotal >= self.minimum_subtotal
    }

    /// `floor(subtotal × discount_rate)` when applicable, otherwise 0.
    #[must_use]
    pub fn discount_for(&self, subtotal: u64) -> u64 {
        if !self.applicable(subtotal) {
            return 0;
        }

        (subtotal as f64 * self.discount_rate).floor() as u64
    }
}

/// The static catalog offered at checkout: 5% off over 100, 10% off over 200.
#[must_use]
pub fn standard_catalog() -> Vec<Coupon> {
    vec![
        Coupon {
            id: "c1".to_string(),
            label: "5% off".to_string(),
            minimum_subtotal: 100,
            discount_rate: 0.05,
        },
        Coupon {
            id: "c2".to_string(),
            label: "10% off".to_string(),
            minimum_subtotal: 200,
            discount_rate: 0.10,
        },
    ]
}
