//! Checkout Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::CartLine;

/// Order lifecycle status.
///
/// Orders are created [`Confirmed`](Self::Confirmed); later transitions are
/// driven by the store-side systems, not by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    /// The next step on the pickup ladder, or `None` once completed.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Completed),
            Self::Completed => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
        };

        f.write_str(label)
    }
}

/// How an order is handed over. Pickup-only marketplace, so there is exactly
/// one method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupMethod {
    #[default]
    Takeout,
}

/// One product quantity inside a pending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub image_ref: String,
    pub description: String,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            image_ref: line.image_ref.clone(),
            description: line.description.clone(),
        }
    }
}

/// The order document handed to the remote order-creation collaborator.
///
/// One of these is produced per distinct store in the cart. `total_price`
/// covers that store's lines only; whether a coupon share is subtracted is a
/// [`CheckoutConfig`](crate::checkout::CheckoutConfig) decision.
///
/// `checkout_session` is shared by every order of one checkout invocation and,
/// together with `store_id`, gives the collaborator a dedup key should the
/// caller retry after a partial failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub member_id: String,
    pub store_id: String,
    pub store_name: String,
    pub store_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub items: Vec<OrderItem>,
    pub total_price: u64,
    pub pickup_time: Timestamp,
    pub pickup_method: PickupMethod,
    pub payment_method: String,
    pub status: OrderStatus,
    pub pickup_code: String,
    pub order_date: Timestamp,
    pub checkout_session: Uuid,
}

/// What the confirmation screen shows per store after a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupSummary {
    pub store_name: String,
    pub pickup_time: Timestamp,
    pub pickup_code: String,
    pub member_name: String,
}

/// The outcome of a fully successful checkout.
///
/// `discount` is the whole-cart coupon discount; `total = subtotal - discount`
/// is what the member sees, independently of what each store order bills.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
    pub orders: Vec<PickupSummary>,
}
