//! # Cart Ledger State
//!
//! Owns the catalog and the cart and serializes every mutation.
//!
//! ## Thread Safety
//! Catalog and cart live together behind one `Arc<Mutex<T>>`:
//! 1. Stock and cart lines must change together or not at all
//! 2. The order simulator commits from a spawned task
//! 3. Only one mutation may run at a time
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  User Action              Ledger call               Side effects        │
//! │  ───────────              ───────────               ────────────        │
//! │                                                                         │
//! │  Add to cart ───────────► add() ──────────┐                            │
//! │  +1 / -1 ───────────────► step_quantity() │   under the lock:          │
//! │  Quantity box ──────────► set_quantity()  ├─► 1. core bookkeeping      │
//! │  Remove ────────────────► remove()        │   2. save key "cart"       │
//! │  Empty cart ────────────► clear()         │                            │
//! │  Import ────────────────► import() ───────┘   after the lock:          │
//! │                                               3. emit CartChanged      │
//! │                                                                         │
//! │  Failures change nothing and emit Error instead.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events are emitted after the lock is released, so listeners may call
//! back into the ledger.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use fiftyone_core::{
    Cart, CartKey, CartLine, CartSnapshot, Catalog, CoreError, CoreResult, EventBus, Money, Order,
    ProductId, StoreEvent,
};
use fiftyone_store::{CartRepository, StoreError};

use crate::error::{ApiError, ApiResult};

/// A cart line joined with its product, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

/// Catalog and cart, always mutated together.
#[derive(Debug)]
pub struct Ledger {
    pub catalog: Catalog,
    pub cart: Cart,
}

impl Ledger {
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.cart.lines().to_vec(),
            item_count: self.cart.item_count(),
            total: self.cart.total(&self.catalog),
        }
    }

    /// Cart lines with product details. Lines whose product no longer
    /// resolves are skipped, as in the cart total.
    pub fn items(&self) -> Vec<CartItem> {
        self.cart
            .lines()
            .iter()
            .filter_map(|line| {
                let product = self.catalog.by_id(line.product_id)?;
                Some(CartItem {
                    product_id: line.product_id,
                    name: product.name.clone(),
                    image: product.image.clone(),
                    size: line.size.clone(),
                    color: line.color.clone(),
                    quantity: line.quantity,
                    unit_price: product.price(),
                    line_total: product.price().multiply_quantity(line.quantity),
                })
            })
            .collect()
    }
}

/// Shared handle to the cart ledger. Clones share the same state.
#[derive(Debug, Clone)]
pub struct CartLedger {
    ledger: Arc<Mutex<Ledger>>,
    carts: CartRepository,
    bus: Arc<EventBus>,
}

impl CartLedger {
    /// Creates a ledger with an empty cart. Nothing is read from storage.
    pub fn new(catalog: Catalog, carts: CartRepository, bus: Arc<EventBus>) -> Self {
        CartLedger {
            ledger: Arc::new(Mutex::new(Ledger {
                catalog,
                cart: Cart::new(),
            })),
            carts,
            bus,
        }
    }

    /// Creates a ledger and re-applies the stored cart to `catalog`.
    ///
    /// ## Startup Repair
    /// ```text
    /// stored cart ──► each line reserves stock again
    ///                   ├── fits ──────────────► kept
    ///                   └── unknown product,
    ///                       bad size/color,
    ///                       not enough stock ──► dropped (warn!)
    /// repaired cart ──► saved back if anything changed
    /// ```
    /// A malformed cart document is treated as an empty cart.
    pub fn open(
        mut catalog: Catalog,
        carts: CartRepository,
        bus: Arc<EventBus>,
    ) -> Result<Self, StoreError> {
        let (stored, malformed) = match carts.load() {
            Ok(lines) => (lines, false),
            Err(StoreError::Serialization { key, source }) => {
                warn!(key = %key, error = %source, "Stored cart is malformed, starting empty");
                (Vec::new(), true)
            }
            Err(e) => return Err(e),
        };

        let stored_lines = stored.len();
        let (cart, rejected) = Cart::restore(&mut catalog, stored);

        for dropped in &rejected {
            warn!(
                product_id = dropped.line.product_id,
                quantity = dropped.line.quantity,
                size = %dropped.line.size,
                color = %dropped.line.color,
                reason = %dropped.reason,
                "Dropped stored cart line"
            );
        }

        if malformed || cart.line_count() != stored_lines {
            carts.save(cart.lines())?;
        }

        info!(
            lines = cart.line_count(),
            items = cart.item_count(),
            dropped = rejected.len(),
            "Cart restored"
        );

        Ok(CartLedger {
            ledger: Arc::new(Mutex::new(Ledger { catalog, cart })),
            carts,
            bus,
        })
    }

    /// Returns the event bus this ledger notifies.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Executes a function with read access to the catalog and cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let stock = ledger.with_ledger(|l| l.catalog.total_stock());
    /// ```
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let ledger = self.lock();
        f(&ledger)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn snapshot(&self) -> CartSnapshot {
        self.with_ledger(Ledger::snapshot)
    }

    /// Sum of price × quantity over lines whose product resolves.
    pub fn total(&self) -> Money {
        self.with_ledger(|l| l.cart.total(&l.catalog))
    }

    pub fn item_count(&self) -> u32 {
        self.with_ledger(|l| l.cart.item_count())
    }

    pub fn is_empty(&self) -> bool {
        self.with_ledger(|l| l.cart.is_empty())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds units of a selection, merging into an existing line.
    ///
    /// A missing color becomes the product's first color.
    pub fn add(
        &self,
        product_id: ProductId,
        quantity: u32,
        size: &str,
        color: Option<&str>,
    ) -> ApiResult<CartSnapshot> {
        debug!(product_id, quantity, size, color = ?color, "Adding to cart");
        self.mutate(|l| {
            l.cart
                .add(&mut l.catalog, product_id, quantity, size, color)
                .map(|_| ())
        })
    }

    /// Removes a line and returns its units to stock.
    ///
    /// ## Returns
    /// * `Ok(false)` - No such line; nothing persisted, nothing emitted
    /// * `Ok(true)` - Line removed
    pub fn remove(&self, key: &CartKey) -> ApiResult<bool> {
        debug!(product_id = key.product_id, size = %key.size, color = %key.color, "Removing from cart");

        let (snapshot, persisted) = {
            let mut guard = self.lock();
            let ledger = &mut *guard;
            if !ledger.cart.remove(&mut ledger.catalog, key) {
                return Ok(false);
            }
            let persisted = self.carts.save(ledger.cart.lines());
            (ledger.snapshot(), persisted)
        };

        self.announce(snapshot, persisted);
        Ok(true)
    }

    /// Sets a line's quantity. `quantity` must be positive; zero goes
    /// through [`CartLedger::remove`].
    pub fn set_quantity(&self, key: &CartKey, quantity: u32) -> ApiResult<CartSnapshot> {
        debug!(product_id = key.product_id, quantity, "Setting cart quantity");
        self.mutate(|l| l.cart.set_quantity(&mut l.catalog, key, quantity))
    }

    /// Moves a line's quantity by `delta` (the +1 / -1 controls). A result of
    /// zero or below removes the line.
    pub fn step_quantity(&self, key: &CartKey, delta: i64) -> ApiResult<CartSnapshot> {
        let current = self.with_ledger(|l| l.cart.find(key).map(|line| line.quantity));
        let Some(current) = current else {
            return Err(self.report(
                CoreError::CartLineNotFound {
                    product_id: key.product_id,
                    size: key.size.clone(),
                    color: key.color.clone(),
                }
                .into(),
            ));
        };

        let target = i64::from(current) + delta;
        if target <= 0 {
            self.remove(key)?;
            return Ok(self.snapshot());
        }

        let target = u32::try_from(target)
            .map_err(|_| self.report(ApiError::invalid_input("quantity is too large")))?;
        self.set_quantity(key, target)
    }

    /// Returns every reserved unit to stock and empties the cart.
    pub fn clear(&self) -> ApiResult<CartSnapshot> {
        debug!("Clearing cart");
        self.mutate(|l| {
            l.cart.clear(&mut l.catalog);
            Ok(())
        })
    }

    /// The cart as pretty-printed JSON, in the stored format.
    pub fn export(&self) -> ApiResult<String> {
        let lines = self.with_ledger(|l| l.cart.lines().to_vec());
        serde_json::to_string_pretty(&lines)
            .map_err(|e| ApiError::internal(format!("Could not export cart: {e}")))
    }

    /// Replaces the cart with an exported snapshot. All or nothing.
    pub fn import(&self, snapshot: &str) -> ApiResult<CartSnapshot> {
        let lines: Vec<CartLine> = serde_json::from_str(snapshot).map_err(|e| {
            self.report(ApiError::invalid_input(format!(
                "Cart snapshot is not valid: {e}"
            )))
        })?;

        info!(lines = lines.len(), "Importing cart");
        self.mutate(|l| l.cart.replace(&mut l.catalog, lines))
    }

    /// Turns the cart into an order in one step.
    ///
    /// `build` receives the lines and the subtotal and must store the order;
    /// only when it succeeds is the cart cleared, returning its units to
    /// stock like [`CartLedger::clear`].
    pub(crate) fn commit_order<F>(&self, build: F) -> ApiResult<Order>
    where
        F: FnOnce(&[CartLine], Money) -> ApiResult<Order>,
    {
        let committed = {
            let mut guard = self.lock();
            let ledger = &mut *guard;

            if ledger.cart.is_empty() {
                Err(CoreError::EmptyCart.into())
            } else {
                let subtotal = ledger.cart.total(&ledger.catalog);
                build(ledger.cart.lines(), subtotal).map(|order| {
                    ledger.cart.clear(&mut ledger.catalog);
                    let persisted = self.carts.save(ledger.cart.lines());
                    (order, ledger.snapshot(), persisted)
                })
            }
        };

        match committed {
            Ok((order, snapshot, persisted)) => {
                self.announce(snapshot, persisted);
                Ok(order)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("Ledger mutex poisoned")
    }

    /// Runs a core operation under the lock, saves the cart on success and
    /// announces the result.
    fn mutate<F>(&self, f: F) -> ApiResult<CartSnapshot>
    where
        F: FnOnce(&mut Ledger) -> CoreResult<()>,
    {
        let outcome = {
            let mut guard = self.lock();
            f(&mut guard).map(|()| {
                let persisted = self.carts.save(guard.cart.lines());
                (guard.snapshot(), persisted)
            })
        };

        match outcome {
            Ok((snapshot, persisted)) => {
                self.announce(snapshot.clone(), persisted);
                Ok(snapshot)
            }
            Err(err) => Err(self.report(err.into())),
        }
    }

    /// A failed save does not undo the in-memory change; it is reported as
    /// an `Error` event ahead of `CartChanged`.
    fn announce(&self, snapshot: CartSnapshot, persisted: Result<(), StoreError>) {
        if let Err(e) = persisted {
            let err = ApiError::from(e);
            self.bus.emit(&StoreEvent::Error(err.message));
        }

        debug!(
            lines = snapshot.lines.len(),
            items = snapshot.item_count,
            total = %snapshot.total,
            "Cart changed"
        );
        self.bus.emit(&StoreEvent::CartChanged(snapshot));
    }

    /// Emits `err` as an `Error` event and hands it back.
    pub(crate) fn report(&self, err: ApiError) -> ApiError {
        debug!(code = ?err.code, message = %err.message, "Cart operation rejected");
        self.bus.emit(&StoreEvent::Error(err.message.clone()));
        err
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
