//! # Cart Repository
//!
//! The persisted cart: a JSON array of cart lines under the `cart` key.
//!
//! Stored lines are raw data. Re-applying them to the catalog (and
//! dropping the ones that no longer fit) is the ledger's job on startup.

use std::sync::Arc;

use tracing::debug;

use fiftyone_core::CartLine;

use crate::error::StoreResult;
use crate::kv::KeyValueStore;
use crate::repository::{read_json, write_json};

/// Storage key of the cart document.
pub const CART_KEY: &str = "cart";

/// Repository for the persisted cart.
#[derive(Clone)]
pub struct CartRepository {
    kv: Arc<dyn KeyValueStore>,
    pretty: bool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(kv: Arc<dyn KeyValueStore>, pretty: bool) -> Self {
        CartRepository { kv, pretty }
    }

    /// Loads the stored lines. A cart that was never saved is empty.
    ///
    /// ## Returns
    /// * `Ok(lines)` - Stored lines in cart order
    /// * `Err(StoreError::Serialization)` - The document is not a line list
    pub fn load(&self) -> StoreResult<Vec<CartLine>> {
        let lines: Vec<CartLine> = read_json(self.kv.as_ref(), CART_KEY)?.unwrap_or_default();
        debug!(lines = lines.len(), "Loaded cart");
        Ok(lines)
    }

    /// Replaces the stored cart with `lines`.
    pub fn save(&self, lines: &[CartLine]) -> StoreResult<()> {
        write_json(self.kv.as_ref(), CART_KEY, lines, self.pretty)?;
        debug!(lines = lines.len(), "Saved cart");
        Ok(())
    }

    /// Deletes the stored cart.
    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(CART_KEY)
    }
}

impl std::fmt::Debug for CartRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartRepository").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
