//! Cart errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The cart already holds lines from another store.
    ///
    /// The cart is single-store; the caller decides whether to keep the
    /// existing contents or go through
    /// [`clear_and_replace`](crate::cart::CartStore::clear_and_replace).
    #[error("cart holds items from store {in_cart}, cannot add items from store {offered}")]
    StoreConflict { in_cart: String, offered: String },
}

impl CartError {
    /// Validation failures fix themselves only through different input;
    /// retrying the same call will fail the same way.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreConflict { .. } => false,
        }
    }
}
