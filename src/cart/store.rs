//! Cart Store
//!
//! The authoritative, single-store cart for the current device session.
//! Every successful mutation overwrites the full snapshot in durable local
//! storage; a failed persist is logged and the in-memory state stays
//! authoritative for the session, so the worst case is a rehydration that
//! misses the latest edit after a restart.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::storage::{CART_KEY, KeyValueStorage};

use super::{errors::CartError, models::CartLine};

pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    lines: Mutex<Vec<CartLine>>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Rehydrate the cart from durable storage.
    ///
    /// A missing snapshot starts an empty cart; an unreadable one is
    /// discarded with a warning rather than failing startup.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let lines = match storage.get(CART_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => lines,
                Err(e) => {
                    warn!(error = %e, "discarding unreadable cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "cart rehydration failed, starting empty");
                Vec::new()
            }
        };

        debug!(lines = lines.len(), "cart rehydrated");

        Self {
            storage,
            lines: Mutex::new(lines),
        }
    }

    /// Add a line, merging quantities when the same `line_id` is already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::StoreConflict`] without mutating anything when the
    /// cart already holds lines from a different store.
    pub async fn add_item(&self, line: CartLine) -> Result<(), CartError> {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());

            if let Some(first) = lines.first() {
                if first.store_id != line.store_id {
                    return Err(CartError::StoreConflict {
                        in_cart: first.store_id.clone(),
                        offered: line.store_id.clone(),
                    });
                }
            }

            match lines.iter_mut().find(|l| l.line_id == line.line_id) {
                Some(existing) => existing.quantity += line.quantity.max(1),
                None => {
                    let mut line = line;
                    line.quantity = line.quantity.max(1);
                    lines.push(line);
                }
            }

            lines.clone()
        };

        self.persist(&snapshot).await;

        Ok(())
    }

    /// Set the quantity for `line_id`, clamped to a minimum of 1.
    ///
    /// Decrementing from 1 is a no-op; taking a line out of the cart goes
    /// through [`remove_item`](Self::remove_item). Unknown ids are ignored.
    pub async fn update_quantity(&self, line_id: &str, quantity: u32) {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());

            let Some(line) = lines.iter_mut().find(|l| l.line_id == line_id) else {
                return;
            };

            line.quantity = quantity.max(1);

            lines.clone()
        };

        self.persist(&snapshot).await;
    }

    /// Delete the line with `line_id`. Absent lines are not an error.
    pub async fn remove_item(&self, line_id: &str) {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
            lines.retain(|l| l.line_id != line_id);
            lines.clone()
        };

        self.persist(&snapshot).await;
    }

    /// Empty the cart and persist the empty state.
    pub async fn clear(&self) {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
            lines.clear();
            lines.clone()
        };

        self.persist(&snapshot).await;
    }

    /// The explicit clear-and-replace path for the cross-store confirmation
    /// flow: drops the current contents and starts a fresh cart with `line`.
    pub async fn clear_and_replace(&self, line: CartLine) {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
            lines.clear();

            let mut line = line;
            line.quantity = line.quantity.max(1);
            lines.push(line);

            lines.clone()
        };

        self.persist(&snapshot).await;
    }

    /// Σ `unit_price × quantity` over current lines.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.iter().map(CartLine::line_total).sum()
    }

    /// A snapshot of the current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    /// Overwrite the stored snapshot. Failures degrade, they do not roll back.
    async fn persist(&self, snapshot: &[CartLine]) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "cart snapshot could not be serialized");
                return;
            }
        };

        if let Err(e) = self.storage.set(CART_KEY, &raw).await {
            warn!(error = %e, "cart persist failed, in-memory state kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::cart::test_support::line;
    use crate::storage::{MemoryStorage, MockKeyValueStorage, StorageError};

    use super::*;

    async fn empty_store() -> CartStore {
        CartStore::load(Arc::new(MemoryStorage::new())).await
    }

    #[tokio::test]
    async fn adding_same_line_id_merges_quantities() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 2)).await?;
        cart.add_item(line("a", "s1", 50, 3)).await?;

        let lines = cart.lines();

        assert_eq!(lines.len(), 1, "expected a single merged line");
        assert_eq!(lines[0].quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn adding_distinct_lines_keeps_both() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 1)).await?;
        cart.add_item(line("b", "s1", 30, 1)).await?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn adding_line_from_other_store_is_rejected_without_mutation() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 1)).await?;

        let result = cart.add_item(line("b", "s2", 30, 1)).await;

        assert!(
            matches!(
                result,
                Err(CartError::StoreConflict { ref in_cart, ref offered })
                    if in_cart == "s1" && offered == "s2"
            ),
            "expected StoreConflict, got {result:?}"
        );
        assert_eq!(cart.len(), 1, "rejected add must not mutate the cart");

        Ok(())
    }

    #[tokio::test]
    async fn clear_and_replace_starts_a_fresh_single_store_cart() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 2)).await?;
        cart.clear_and_replace(line("b", "s2", 30, 1)).await;

        let lines = cart.lines();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].store_id, "s2");

        cart.add_item(line("c", "s2", 20, 1)).await?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_clamps_to_one() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 1)).await?;
        cart.update_quantity("a", 0).await;

        assert_eq!(cart.lines()[0].quantity, 1, "quantity must never reach 0");

        cart.update_quantity("a", 4).await;

        assert_eq!(cart.lines()[0].quantity, 4);

        Ok(())
    }

    #[tokio::test]
    async fn update_quantity_for_unknown_line_is_a_noop() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 1)).await?;
        cart.update_quantity("missing", 7).await;

        assert_eq!(cart.lines()[0].quantity, 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_is_idempotent() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 1)).await?;
        cart.remove_item("a").await;
        cart.remove_item("a").await;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn subtotal_sums_price_times_quantity() -> TestResult {
        let cart = empty_store().await;

        cart.add_item(line("a", "s1", 50, 2)).await?;
        cart.add_item(line("b", "s1", 30, 1)).await?;

        assert_eq!(cart.subtotal(), 130);

        Ok(())
    }

    #[tokio::test]
    async fn subtotal_of_empty_cart_is_zero() {
        let cart = empty_store().await;

        assert_eq!(cart.subtotal(), 0);
    }

    #[tokio::test]
    async fn mutations_survive_a_failing_persist() -> TestResult {
        let mut storage = MockKeyValueStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let cart = CartStore::load(Arc::new(storage)).await;

        cart.add_item(line("a", "s1", 50, 2)).await?;

        assert_eq!(cart.subtotal(), 100, "in-memory state is authoritative");

        Ok(())
    }

    #[tokio::test]
    async fn cart_rehydrates_from_persisted_snapshot() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());

        {
            let cart = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>).await;
            cart.add_item(line("a", "s1", 50, 2)).await?;
            cart.add_item(line("b", "s1", 30, 1)).await?;
        }

        let reloaded = CartStore::load(storage).await;

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.subtotal(), 130);

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_discarded() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CART_KEY, "not json").await?;

        let cart = CartStore::load(storage).await;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_persists_the_empty_state() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());

        let cart = CartStore::load(Arc::clone(&storage) as Arc<dyn KeyValueStorage>).await;
        cart.add_item(line("a", "s1", 50, 2)).await?;
        cart.clear().await;

        let reloaded = CartStore::load(storage).await;

        assert!(reloaded.is_empty());

        Ok(())
    }
}
