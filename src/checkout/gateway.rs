//! Remote order-creation collaborator.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use super::models::PendingOrder;

/// Identifier assigned by the collaborator to a created order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderId(pub String);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum OrderGatewayError {
    /// The collaborator could not be reached or answered with a transient
    /// failure; the caller may retry.
    #[error("order service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator refused the order; retrying the same payload will
    /// fail the same way.
    #[error("order rejected: {0}")]
    Rejected(String),
}

impl OrderGatewayError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Rejected(_) => false,
        }
    }
}

/// Creates orders in the remote document store.
///
/// At-least-once from the caller's perspective: the engine neither retries
/// nor dedupes. Implementations that want retry safety can key on
/// `checkout_session` + `store_id` of the [`PendingOrder`].
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, order: &PendingOrder) -> Result<OrderId, OrderGatewayError>;
}
