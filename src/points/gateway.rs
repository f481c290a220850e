//! Remote ledger collaborator.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use super::models::LedgerSnapshot;

#[derive(Debug, Error)]
pub enum LedgerGatewayError {
    /// The collaborator could not be reached; the caller may retry.
    #[error("ledger service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator refused the update.
    #[error("ledger update rejected: {0}")]
    Rejected(String),
}

impl LedgerGatewayError {
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Rejected(_) => false,
        }
    }
}

/// Reads and updates the member points ledger in the remote document store.
#[automock]
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// The full ledger for `member_id`; members with no ledger yet read as an
    /// empty one.
    async fn read_ledger(&self, member_id: &str) -> Result<LedgerSnapshot, LedgerGatewayError>;

    /// Apply `delta` to the balance and prepend `history_entry`.
    ///
    /// Implementations must use the store's atomic increment primitive, not a
    /// client-side read-modify-write, so concurrent check-ins from multiple
    /// devices do not lose updates.
    async fn apply_delta(
        &self,
        member_id: &str,
        delta: i64,
        history_entry: &str,
    ) -> Result<(), LedgerGatewayError>;
}
