//! Application Context
//!
//! The composition root: wires storage, the order and ledger collaborators
//! and the current identity into one ready-to-use handle. Screens receive an
//! [`AppContext`] and never construct services themselves.

use std::sync::Arc;

use tracing::info;

use crate::cart::CartStore;
use crate::checkout::{CheckoutConfig, CheckoutEngine, OrderGateway};
use crate::identity::{IdentityProvider, Member};
use crate::points::{LedgerGateway, PointsBackend, PointsConfig, PointsService};
use crate::storage::KeyValueStorage;

pub struct AppContext {
    pub cart: Arc<CartStore>,
    pub checkout: Arc<CheckoutEngine>,
    pub points: Arc<PointsService>,
    identity: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cart", &self.cart)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Rehydrate the cart and pick the points backend for the current
    /// identity: the remote ledger for a signed-in member, device-local
    /// storage for guests. The choice is fixed for the lifetime of the
    /// context; switching identities means bootstrapping a fresh one.
    pub async fn bootstrap(
        storage: Arc<dyn KeyValueStorage>,
        orders: Arc<dyn OrderGateway>,
        ledger: Arc<dyn LedgerGateway>,
        identity: Arc<dyn IdentityProvider>,
        checkout_config: CheckoutConfig,
        points_config: PointsConfig,
    ) -> Self {
        let member = identity.current_member();

        let backend = if member.is_guest() {
            PointsBackend::Local(Arc::clone(&storage))
        } else {
            PointsBackend::Remote(ledger)
        };

        info!(member_id = %member.member_id, backend = ?backend, "bootstrapping app context");

        let cart = Arc::new(CartStore::load(storage).await);
        let checkout = Arc::new(CheckoutEngine::with_config(orders, checkout_config));
        let points = Arc::new(PointsService::new(backend, points_config));

        Self {
            cart,
            checkout,
            points,
            identity,
        }
    }

    /// The identity every operation acts on behalf of.
    #[must_use]
    pub fn current_member(&self) -> Member {
        self.identity.current_member()
    }
}
