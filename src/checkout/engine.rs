//! Checkout / Order-Grouping Engine
//!
//! Turns the cart into one remote order per store: whole-cart totals and
//! coupon discount, per-store grouping in first-appearance order, a fresh
//! pickup code per group, sequential order creation, and a cart clear only
//! once every group has been committed.

use std::sync::Arc;

use jiff::Zoned;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::cart::{CartLine, CartStore};
use crate::identity::Member;

use super::coupon::Coupon;
use super::errors::CheckoutError;
use super::gateway::OrderGateway;
use super::models::{
    CheckoutReceipt, OrderItem, OrderStatus, PendingOrder, PickupMethod, PickupSummary,
};
use super::pickup::PickupSlot;

const PICKUP_CODE_LEN: usize = 6;
const PICKUP_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Checkout policy knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutConfig {
    /// When set, each store order bills its subtotal minus a floor-allocated
    /// proportional share of the coupon discount. Off by default: the
    /// discount is a member-facing total adjustment only and stores bill
    /// full price, with the platform settling the difference.
    pub apply_discount_to_orders: bool,
}

pub struct CheckoutEngine {
    orders: Arc<dyn OrderGateway>,
    config: CheckoutConfig,
}

impl std::fmt::Debug for CheckoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CheckoutEngine {
    #[must_use]
    pub fn new(orders: Arc<dyn OrderGateway>) -> Self {
        Self::with_config(orders, CheckoutConfig::default())
    }

    #[must_use]
    pub fn with_config(orders: Arc<dyn OrderGateway>, config: CheckoutConfig) -> Self {
        Self { orders, config }
    }

    /// Check the cart out: one remote order per store, then clear the cart.
    ///
    /// Order creation is strictly sequential in store-group order. On the
    /// first failure the cart is left untouched and the error carries the
    /// summaries of the groups already committed; nothing is rolled back.
    ///
    /// The coupon is transient to this invocation — on success the caller
    /// drops its selection along with the cleared cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] before any remote call.
    /// - [`CheckoutError::PickupSlot`] when the slot cannot be resolved
    ///   against today's date.
    /// - [`CheckoutError::OrderCreation`] when the gateway refuses a group.
    pub async fn checkout(
        &self,
        cart: &CartStore,
        member: &Member,
        coupon: Option<&Coupon>,
        slot: PickupSlot,
        payment_method: &str,
        now: &Zoned,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let lines = cart.lines();

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let subtotal: u64 = lines.iter().map(CartLine::line_total).sum();
        let discount = coupon.map_or(0, |c| c.discount_for(subtotal));
        let total = subtotal - discount;

        let pickup_time = slot.resolve(now)?;
        let order_date = now.timestamp();
        let session = Uuid::new_v4();

        let groups = group_by_store(&lines);
        let mut committed = Vec::with_capacity(groups.len());

        for group in &groups {
            let order = self.build_order(
                group,
                member,
                subtotal,
                discount,
                pickup_time,
                order_date,
                payment_method,
                session,
            );

            match self.orders.create_order(&order).await {
                Ok(order_id) => {
                    info!(
                        order_id = %order_id,
                        store_id = %order.store_id,
                        total_price = order.total_price,
                        "order created"
                    );

                    committed.push(PickupSummary {
                        store_name: order.store_name,
                        pickup_time,
                        pickup_code: order.pickup_code,
                        member_name: member.display_name.clone(),
                    });
                }
                Err(source) => {
                    return Err(CheckoutError::OrderCreation {
                        store_name: order.store_name,
                        committed,
                        source,
                    });
                }
            }
        }

        cart.clear().await;

        info!(
            orders = committed.len(),
            subtotal, discount, total, "checkout complete"
        );

        Ok(CheckoutReceipt {
            subtotal,
            discount,
            total,
            orders: committed,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_order(
        &self,
        group: &[CartLine],
        member: &Member,
        cart_subtotal: u64,
        discount: u64,
        pickup_time: jiff::Timestamp,
        order_date: jiff::Timestamp,
        payment_method: &str,
        session: Uuid,
    ) -> PendingOrder {
        // Groups are non-empty by construction.
        let first = &group[0];

        let group_subtotal: u64 = group.iter().map(CartLine::line_total).sum();
        let total_price = if self.config.apply_discount_to_orders {
            group_subtotal - discount_share(discount, group_subtotal, cart_subtotal)
        } else {
            group_subtotal
        };

        PendingOrder {
            member_id: member.member_id.clone(),
            store_id: first.store_id.clone(),
            store_name: first.store_name.clone(),
            store_address: first.store_address.clone(),
            latitude: first.store_latitude,
            longitude: first.store_longitude,
            items: group.iter().map(OrderItem::from).collect(),
            total_price,
            pickup_time,
            pickup_method: PickupMethod::Takeout,
            payment_method: payment_method.to_string(),
            status: OrderStatus::Confirmed,
            pickup_code: generate_pickup_code(),
            order_date,
            checkout_session: session,
        }
    }
}

/// Group lines by `store_id`, preserving first-appearance order of stores and
/// line order within each store.
fn group_by_store(lines: &[CartLine]) -> Vec<Vec<CartLine>> {
    let mut groups: Vec<Vec<CartLine>> = Vec::new();

    for line in lines {
        match groups
            .iter_mut()
            .find(|g| g[0].store_id == line.store_id)
        {
            Some(group) => group.push(line.clone()),
            None => groups.push(vec![line.clone()]),
        }
    }

    groups
}

/// Floor-allocated proportional share of the whole-cart discount for one
/// store group. Rounding remainders stay unallocated (the platform absorbs
/// them), so the shares never exceed the discount.
fn discount_share(discount: u64, group_subtotal: u64, cart_subtotal: u64) -> u64 {
    if cart_subtotal == 0 {
        return 0;
    }

    discount * group_subtotal / cart_subtotal
}

/// A fresh 6-character uppercase alphanumeric pickup code.
///
/// Collisions across orders are accepted as negligible; no uniqueness check
/// is made against existing codes.
fn generate_pickup_code() -> String {
    let mut rng = rand::thread_rng();

    (0..PICKUP_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..PICKUP_CODE_CHARSET.len());
            PICKUP_CODE_CHARSET[idx] as char
        })
        .collect()
}
