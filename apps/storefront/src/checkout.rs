//! # Order Simulator
//!
//! Turns the cart into a confirmed order after a simulated processing delay.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       submit(customer)                                  │
//! │                                                                         │
//! │  1. cart empty? ──────────────────────────► Err(EmptyCart), no delay    │
//! │  2. sleep(delay)            other input keeps being served              │
//! │  3. under the ledger lock:                                              │
//! │     ├── cart emptied meanwhile? ──────────► Err(EmptyCart)              │
//! │     ├── subtotal = cart total                                           │
//! │     ├── total = subtotal + shipping                                     │
//! │     ├── id = UUID v4                                                    │
//! │     ├── append to order history (key "orders")                          │
//! │     └── clear the cart (units go back to stock)                         │
//! │  4. emit CartChanged, resolve with the order                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order snapshot is taken at commit time, so changes made to the cart
//! while the order is pending are part of the order.

use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use fiftyone_core::{CoreError, CustomerInfo, Money, Order, OrderStatus};
use fiftyone_store::OrderRepository;

use crate::error::{ApiError, ApiResult};
use crate::state::{CartItem, CartLedger};

/// Totals shown on the checkout panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub shipping: Money,
    pub total: Money,
}

/// Converts the cart into orders.
#[derive(Debug, Clone)]
pub struct OrderSimulator {
    ledger: CartLedger,
    orders: OrderRepository,
    delay: Duration,
    shipping: Money,
}

impl OrderSimulator {
    /// Creates a simulator. `delay` is the simulated processing time; tests
    /// pass zero or run on paused time.
    pub fn new(ledger: CartLedger, orders: OrderRepository, delay: Duration, shipping: Money) -> Self {
        OrderSimulator {
            ledger,
            orders,
            delay,
            shipping,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    /// What the order would look like if committed now.
    pub fn summary(&self) -> CheckoutSummary {
        let (items, subtotal) = self
            .ledger
            .with_ledger(|l| (l.items(), l.cart.total(&l.catalog)));

        CheckoutSummary {
            items,
            subtotal,
            shipping: self.shipping,
            total: subtotal + self.shipping,
        }
    }

    /// Submits the cart as an order.
    ///
    /// ## Returns
    /// * `Ok(order)` - Stored, cart emptied
    /// * `Err(EMPTY_CART)` - Nothing to order; history unchanged
    /// * `Err(STORAGE_ERROR)` - History could not be written; cart unchanged
    pub async fn submit(&self, customer: CustomerInfo) -> ApiResult<Order> {
        if self.ledger.is_empty() {
            return Err(self.ledger.report(CoreError::EmptyCart.into()));
        }

        info!(
            delay_ms = self.delay.as_millis() as u64,
            items = self.ledger.item_count(),
            "Processing order"
        );
        tokio::time::sleep(self.delay).await;

        let shipping = self.shipping;
        let orders = &self.orders;
        let order = self.ledger.commit_order(|lines, subtotal| {
            let order = Order {
                id: Uuid::new_v4().to_string(),
                items: lines.to_vec(),
                subtotal,
                shipping,
                total: subtotal + shipping,
                customer_info: customer,
                status: OrderStatus::Confirmed,
                created_at: Utc::now(),
            };
            orders.append(&order)?;
            Ok(order)
        })?;

        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.total,
            "Order confirmed"
        );
        Ok(order)
    }

    /// Every order, oldest first.
    pub fn history(&self) -> ApiResult<Vec<Order>> {
        Ok(self.orders.list()?)
    }

    /// Looks up one order.
    pub fn order(&self, id: &str) -> ApiResult<Order> {
        self.orders
            .get(id)?
            .ok_or_else(|| ApiError::not_found("Order", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fiftyone_core::{Catalog, EventBus};
    use fiftyone_store::Storage;
    use std::sync::Arc;

    fn setup(delay: Duration) -> (OrderSimulator, CartLedger, Storage) {
        let storage = Storage::in_memory();
        let ledger = CartLedger::new(
            Catalog::seeded(),
            storage.carts(),
            Arc::new(EventBus::new()),
        );
        let simulator = OrderSimulator::new(
            ledger.clone(),
            storage.orders(),
            delay,
            Money::from_cents(599),
        );
        (simulator, ledger, storage)
    }

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            phone: "555-0101".to_string(),
            address: "Av. Larco 123".to_string(),
            city: "Lima".to_string(),
            zip: "15074".to_string(),
            ..CustomerInfo::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_builds_and_stores_order() {
        let (simulator, ledger, storage) = setup(Duration::from_secs(2));
        ledger.add(1, 2, "M", None).unwrap();
        ledger.add(4, 1, "L", None).unwrap();

        let order = simulator.submit(customer()).await.unwrap();

        assert_eq!(order.subtotal.cents(), 2 * 2999 + 7999);
        assert_eq!(order.shipping.cents(), 599);
        assert_eq!(order.total, order.subtotal + order.shipping);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, OrderStatus::Confirmed);

        assert!(ledger.is_empty());
        assert!(storage.carts().load().unwrap().is_empty());
        assert_eq!(storage.orders().list().unwrap(), vec![order]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_waits_for_delay() {
        let (simulator, ledger, storage) = setup(Duration::from_secs(2));
        ledger.add(5, 1, "M", None).unwrap();

        let pending = tokio::spawn({
            let simulator = simulator.clone();
            async move { simulator.submit(customer()).await }
        });
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(1999)).await;
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());
        assert_eq!(storage.orders().count().unwrap(), 0);
        assert_eq!(ledger.item_count(), 1);

        let order = pending.await.unwrap().unwrap();
        assert_eq!(order.total.cents(), 3499 + 599);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_without_history_change() {
        let (simulator, _ledger, storage) = setup(Duration::ZERO);

        let err = simulator.submit(customer()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(storage.orders().count().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_emptied_while_pending() {
        let (simulator, ledger, storage) = setup(Duration::from_secs(2));
        ledger.add(2, 1, "M", None).unwrap();

        let pending = tokio::spawn({
            let simulator = simulator.clone();
            async move { simulator.submit(customer()).await }
        });
        tokio::task::yield_now().await;
        ledger.clear().unwrap();

        let err = pending.await.unwrap().unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(storage.orders().count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_returns_units_to_stock() {
        let (simulator, ledger, _storage) = setup(Duration::ZERO);
        ledger.add(6, 4, "M", None).unwrap();
        assert_eq!(ledger.with_ledger(|l| l.catalog.by_id(6).unwrap().stock), 6);

        simulator.submit(customer()).await.unwrap();

        let (stock, reserved) = ledger.with_ledger(|l| {
            (l.catalog.by_id(6).unwrap().stock, l.cart.item_count())
        });
        assert_eq!(reserved, 0);
        assert_eq!(stock, 10);
    }

    #[tokio::test]
    async fn test_order_ids_are_unique_and_retrievable() {
        let (simulator, ledger, _storage) = setup(Duration::ZERO);

        ledger.add(1, 1, "M", None).unwrap();
        let first = simulator.submit(customer()).await.unwrap();
        ledger.add(1, 1, "M", None).unwrap();
        let second = simulator.submit(customer()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(simulator.history().unwrap().len(), 2);
        assert_eq!(simulator.order(&second.id).unwrap(), second);
        assert_eq!(
            simulator.order("missing").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_summary() {
        let (simulator, ledger, _storage) = setup(Duration::ZERO);
        ledger.add(3, 2, "S", None).unwrap();

        let summary = simulator.summary();

        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].line_total.cents(), 2 * 5999);
        assert_eq!(summary.subtotal.cents(), 2 * 5999);
        assert_eq!(summary.total.cents(), 2 * 5999 + 599);
    }
}
