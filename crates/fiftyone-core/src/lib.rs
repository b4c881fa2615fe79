//! # fiftyone-core: Pure Business Logic for the FiftyOne Storefront
//!
//! This crate is the **heart** of the storefront. It holds the catalog, the
//! cart with its stock bookkeeping, checkout validation, and the observer
//! bus, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     FiftyOne Storefront Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation (apps/storefront)                 │   │
//! │  │   Product grid ──► Cart panel ──► Checkout ──► Confirmation     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          Cart ledger + order simulator (apps/storefront)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ fiftyone-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐  │   │
//! │  │  │ catalog │ │  cart   │ │  money  │ │validation│ │ events  │  │   │
//! │  │  │ Catalog │ │  Cart   │ │  Money  │ │  forms   │ │EventBus │  │   │
//! │  │  └─────────┘ └─────────┘ └─────────┘ └──────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • NO LOGGING                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               fiftyone-store (Durable Storage)                  │   │
//! │  │            key-value store, cart & order repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, Order, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Product lookup, search, filtering
//! - [`cart`] - Cart lines and the stock invariant
//! - [`events`] - Typed observer bus
//! - [`error`] - Domain error types
//! - [`validation`] - Input and checkout form validation
//!
//! ## Example Usage
//!
//! ```rust
//! use fiftyone_core::{Cart, Catalog};
//!
//! let mut catalog = Catalog::seeded();
//! let mut cart = Cart::new();
//!
//! cart.add(&mut catalog, 1, 2, "M", None).unwrap();
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.total(&catalog).cents(), 5998);
//! assert_eq!(catalog.by_id(1).unwrap().stock, 13);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod events;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, RejectedLine};
pub use catalog::{Catalog, CatalogStats};
pub use error::{CoreError, CoreResult, FormErrors, ValidationError};
pub use events::{CartSnapshot, EventBus, EventKind, StoreEvent, SubscriptionId};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat shipping fee added to every order: $5.99.
pub const SHIPPING_FEE_CENTS: i64 = 599;

/// Simulated order-processing latency.
pub const ORDER_DELAY_MS: u64 = 2000;

/// Size used when the shopper adds from the grid without choosing one.
pub const DEFAULT_SIZE: &str = "M";

/// Quantity used when the shopper does not enter one.
pub const DEFAULT_QUANTITY: u32 = 1;
