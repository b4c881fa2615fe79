//! # Checkout Commands
//!
//! Checkout panel, order submission and order history.
//!
//! ## Submission Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shopper fills the checkout form and presses "Place order"             │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  submit_order(customer)                                                │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  ┌────────────────────────────────────────────────────────────────┐    │
//! │  │  1. Validate form (every failing field reported)              │    │
//! │  │  2. Order simulator: empty check, delay, commit               │    │
//! │  │  3. Return the confirmed order                                │    │
//! │  └────────────────────────────────────────────────────────────────┘    │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  Success panel with the order number                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use fiftyone_core::validation::validate_customer_info;
use fiftyone_core::{CustomerInfo, Order};

use crate::checkout::{CheckoutSummary, OrderSimulator};
use crate::error::ApiResult;

/// Gets the checkout panel totals.
pub fn get_checkout_summary(simulator: &OrderSimulator) -> CheckoutSummary {
    debug!("get_checkout_summary command");
    simulator.summary()
}

/// Validates the form and submits the order.
///
/// ## Returns
/// * `Ok(order)` - Order confirmed, cart emptied
/// * `Err(INVALID_INPUT)` - Form errors in `fields`; nothing submitted
/// * `Err(EMPTY_CART)` - Nothing to order
pub async fn submit_order(simulator: &OrderSimulator, customer: CustomerInfo) -> ApiResult<Order> {
    debug!("submit_order command");
    validate_customer_info(&customer)?;

    let order = simulator.submit(customer).await?;
    info!(order_id = %order.id, "Order placed");
    Ok(order)
}

/// Lists past orders, oldest first.
pub fn list_orders(simulator: &OrderSimulator) -> ApiResult<Vec<Order>> {
    debug!("list_orders command");
    simulator.history()
}

/// Gets one past order.
pub fn get_order(simulator: &OrderSimulator, id: &str) -> ApiResult<Order> {
    debug!(order_id = %id, "get_order command");
    simulator.order(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::CartLedger;
    use fiftyone_core::{Catalog, EventBus, Money};
    use fiftyone_store::Storage;
    use std::sync::Arc;
    use std::time::Duration;

    fn simulator() -> (OrderSimulator, CartLedger) {
        let storage = Storage::in_memory();
        let ledger = CartLedger::new(
            Catalog::seeded(),
            storage.carts(),
            Arc::new(EventBus::new()),
        );
        let simulator = OrderSimulator::new(
            ledger.clone(),
            storage.orders(),
            Duration::ZERO,
            Money::from_cents(599),
        );
        (simulator, ledger)
    }

    #[tokio::test]
    async fn test_invalid_form_submits_nothing() {
        let (simulator, ledger) = simulator();
        ledger.add(1, 1, "M", None).unwrap();

        let customer = CustomerInfo {
            name: "Ana".to_string(),
            email: "ana@".to_string(),
            ..CustomerInfo::default()
        };
        let err = submit_order(&simulator, customer).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.field("email").is_some());
        assert!(err.field("phone").is_some());
        assert!(err.field("name").is_none());
        assert_eq!(ledger.item_count(), 1);
        assert!(list_orders(&simulator).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_valid_form_places_order() {
        let (simulator, ledger) = simulator();
        ledger.add(6, 1, "XL", None).unwrap();

        let customer = CustomerInfo {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+51 555 0101".to_string(),
            address: "Av. Larco 123".to_string(),
            city: "Lima".to_string(),
            zip: "15074".to_string(),
            ..CustomerInfo::default()
        };
        let order = submit_order(&simulator, customer).await.unwrap();

        assert_eq!(order.total.cents(), 3999 + 599);
        assert_eq!(get_order(&simulator, &order.id).unwrap(), order);
        assert_eq!(get_checkout_summary(&simulator).items.len(), 0);
    }
}
