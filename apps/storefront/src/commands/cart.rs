//! # Cart Commands
//!
//! Cart panel actions.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │   Form   │     │ Confirmed│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       submit_order                       │
//! │                   step_cart_item    (checkout.rs)                      │
//! │                   update_cart_item                                     │
//! │                   remove_from_cart                                     │
//! │                   import_cart                                          │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use fiftyone_core::{CartKey, Money, ProductId, DEFAULT_QUANTITY, DEFAULT_SIZE};

use crate::error::ApiResult;
use crate::state::{CartItem, CartLedger};

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub total: Money,
}

/// Identifies one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSelector {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineSelector {
    fn key(&self) -> CartKey {
        CartKey::new(self.product_id, self.size.clone(), self.color.clone())
    }
}

/// Gets the current cart contents.
pub fn get_cart(ledger: &CartLedger) -> CartResponse {
    debug!("get_cart command");
    ledger.with_ledger(|l| CartResponse {
        items: l.items(),
        item_count: l.cart.item_count(),
        total: l.cart.total(&l.catalog),
    })
}

/// Adds a product to the cart.
///
/// ## Defaults
/// - quantity: 1
/// - size: "M"
/// - color: the product's first color
pub fn add_to_cart(
    ledger: &CartLedger,
    product_id: ProductId,
    quantity: Option<u32>,
    size: Option<&str>,
    color: Option<&str>,
) -> ApiResult<CartResponse> {
    let quantity = quantity.unwrap_or(DEFAULT_QUANTITY);
    let size = size.filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_SIZE);
    debug!(product_id, quantity, size, "add_to_cart command");

    ledger.add(product_id, quantity, size, color)?;
    Ok(get_cart(ledger))
}

/// Sets the quantity of a line. Zero or below removes it.
pub fn update_cart_item(
    ledger: &CartLedger,
    line: &LineSelector,
    quantity: i64,
) -> ApiResult<CartResponse> {
    debug!(product_id = line.product_id, quantity, "update_cart_item command");

    if quantity <= 0 {
        ledger.remove(&line.key())?;
    } else {
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        ledger.set_quantity(&line.key(), quantity)?;
    }
    Ok(get_cart(ledger))
}

/// The +1 / -1 buttons.
pub fn step_cart_item(ledger: &CartLedger, line: &LineSelector, delta: i64) -> ApiResult<CartResponse> {
    debug!(product_id = line.product_id, delta, "step_cart_item command");
    ledger.step_quantity(&line.key(), delta)?;
    Ok(get_cart(ledger))
}

/// Removes a line. Removing a line that isn't there is not an error.
pub fn remove_from_cart(ledger: &CartLedger, line: &LineSelector) -> ApiResult<CartResponse> {
    debug!(product_id = line.product_id, "remove_from_cart command");
    ledger.remove(&line.key())?;
    Ok(get_cart(ledger))
}

/// Clears all items from the cart.
pub fn clear_cart(ledger: &CartLedger) -> ApiResult<CartResponse> {
    debug!("clear_cart command");
    ledger.clear()?;
    Ok(get_cart(ledger))
}

/// The cart as a JSON snapshot for backup.
pub fn export_cart(ledger: &CartLedger) -> ApiResult<String> {
    debug!("export_cart command");
    ledger.export()
}

/// Restores a snapshot produced by [`export_cart`].
pub fn import_cart(ledger: &CartLedger, snapshot: &str) -> ApiResult<CartResponse> {
    debug!(bytes = snapshot.len(), "import_cart command");
    ledger.import(snapshot)?;
    Ok(get_cart(ledger))
}
