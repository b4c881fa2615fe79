//! # Commands Module
//!
//! Every user action the storefront understands.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── catalog.rs   ◄─── Product grid, detail, stats
//! ├── cart.rs      ◄─── Cart manipulation, export/import
//! ├── checkout.rs  ◄─── Checkout summary, order submission, history
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Session driver                                                         │
//! │  ──────────────                                                         │
//! │  {"action":"add_to_cart","productId":1,"size":"L"}                      │
//! │         │                                                               │
//! │         │ (serde, tagged by "action")                                   │
//! │         ▼                                                               │
//! │  Rust command                                                           │
//! │  ────────────                                                           │
//! │  fn add_to_cart(                                                        │
//! │      ledger: &CartLedger,     ◄── Only the state it needs              │
//! │      product_id: ProductId,                                             │
//! │      quantity: Option<u32>,   ◄── Optional param                       │
//! │      ...                                                                │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  View renders CartResponse / ApiError                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands hold no business rules; they pick defaults, validate raw input
//! and call into the ledger or the order simulator.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
