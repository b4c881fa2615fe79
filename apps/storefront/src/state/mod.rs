//! # State Module
//!
//! Application state for the storefront.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Storefront::open                           │   │
//! │  │  AppConfig::load ──► StorageState::open ──► CartLedger::open     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ StorageState │  │  CartLedger  │  │    AppConfig     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Storage     │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │  (cart,      │  │   catalog +  │  │  order delay     │              │
//! │  │   orders)    │  │   cart >>    │  │  shipping fee    │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StorageState: shared backend, appends serialized                    │
//! │  • CartLedger: one mutex for catalog and cart together                 │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ledger;
mod storage;

pub use config::{AppConfig, ConfigError, ConfigResult};
pub use ledger::{CartItem, CartLedger, Ledger};
pub use storage::StorageState;
