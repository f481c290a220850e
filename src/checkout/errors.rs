//! Checkout errors.

use thiserror::Error;

use super::gateway::OrderGatewayError;
use super::models::PickupSummary;
use super::pickup::PickupSlotError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to check out; no remote call was made.
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    PickupSlot(#[from] PickupSlotError),

    /// Order creation failed partway through the store groups.
    ///
    /// `committed` lists the groups already created remotely — those orders
    /// are not rolled back, and the cart has not been cleared, so a naive
    /// whole-cart retry would duplicate them.
    #[error("order creation failed for store {store_name} ({} group(s) already committed)", committed.len())]
    OrderCreation {
        store_name: String,
        committed: Vec<PickupSummary>,
        #[source]
        source: OrderGatewayError,
    },
}

impl CheckoutError {
    /// Distinguishes "fix your input" validation failures from I/O failures
    /// the caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::EmptyCart | Self::PickupSlot(_) => false,
            Self::OrderCreation { source, .. } => source.is_retryable(),
        }
    }
}
