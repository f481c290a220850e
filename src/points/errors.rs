//! Points errors.

use thiserror::Error;

use super::gateway::LedgerGatewayError;

#[derive(Debug, Error)]
pub enum PointsError {
    /// The redemption costs more than the member has; nothing was mutated.
    #[error("insufficient points: need {needed}, have {available}")]
    InsufficientPoints { needed: u64, available: u64 },

    /// Another check-in or redemption is still in flight (double-tap guard).
    #[error("a points operation is already in progress")]
    Busy,

    #[error(transparent)]
    Ledger(#[from] LedgerGatewayError),
}

impl PointsError {
    /// Distinguishes "fix your input" validation failures from I/O failures
    /// the caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InsufficientPoints { .. } | Self::Busy => false,
            Self::Ledger(e) => e.is_retryable(),
        }
    }
}
