//! Checkout

pub mod coupon;
pub mod engine;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod pickup;

pub use coupon::Coupon;
pub use engine::{CheckoutConfig, CheckoutEngine};
pub use errors::CheckoutError;
pub use gateway::{OrderGateway, OrderGatewayError, OrderId};
pub use models::{
    CheckoutReceipt, OrderItem, OrderStatus, PendingOrder, PickupMethod, PickupSummary,
};
pub use pickup::{PickupSlot, PickupSlotError};
