//! # FiftyOne Storefront Library
//!
//! Application shell for the FiftyOne storefront: owns the cart ledger,
//! runs the order simulator and renders text views for the session driver.
//!
//! ## Module Organization
//! ```text
//! fiftyone_storefront/
//! ├── lib.rs          ◄─── You are here (Storefront context, tracing setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── storage.rs  ◄─── Storage handle wrapper
//! │   ├── ledger.rs   ◄─── Catalog + cart behind one mutex
//! │   └── config.rs   ◄─── Configuration (defaults, TOML, env)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Product grid, detail, stats
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Order submission and history
//! │   └── config.rs   ◄─── Configuration retrieval
//! ├── checkout.rs     ◄─── Order simulator (delay, commit)
//! ├── notifier.rs     ◄─── Bus events → notifications
//! ├── view.rs         ◄─── Text renderers
//! ├── session.rs      ◄─── JSON actions → commands → views
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Context                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │  StorageState    │ │   CartLedger     │ │    AppConfig         │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • cart key      │ │  • Catalog       │ │  • Store name        │   │
//! │  │  • orders key    │ │  • Cart          │ │  • Shipping fee      │   │
//! │  │                  │ │  • EventBus      │ │  • Order delay       │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐                             │
//! │  │  OrderSimulator  │ │    Notifier      │                             │
//! │  │  (ledger clone)  │ │  (bus listener)  │                             │
//! │  └──────────────────┘ └──────────────────┘                             │
//! │                                                                         │
//! │  Each command only takes the piece of state it needs.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod commands;
pub mod error;
pub mod notifier;
pub mod session;
pub mod state;
pub mod view;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fiftyone_core::{Catalog, EventBus};
use fiftyone_store::{Storage, StoreError};

use checkout::OrderSimulator;
use notifier::Notifier;
use state::{AppConfig, CartLedger, ConfigError, StorageState};

/// Why the storefront could not start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open storage: {0}")]
    Storage(#[from] StoreError),
}

/// Everything a session needs, wired together.
#[derive(Debug, Clone)]
pub struct Storefront {
    pub config: AppConfig,
    pub storage: StorageState,
    pub ledger: CartLedger,
    pub simulator: OrderSimulator,
    pub notifier: Notifier,
}

impl Storefront {
    /// Opens storage from `config` and restores the stored cart.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  1. Open storage ──────────────► data_dir/cart.json, orders.json    │
    /// │  2. Seed catalog ──────────────► six products, seeded stock         │
    /// │  3. Restore cart ──────────────► stored lines reserve stock again   │
    /// │  4. Check order history ───────► unreadable one moved aside         │
    /// │  5. Attach notifier ───────────► CartChanged, Error                 │
    /// │  6. Build order simulator ─────► delay, shipping from config        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn open(config: AppConfig) -> Result<Self, StartupError> {
        let storage = StorageState::open(config.store_config())?;
        info!(data_dir = %config.data_dir.display(), "Storage opened");
        Ok(Storefront::with_storage(config, storage.inner().clone())?)
    }

    /// Builds the storefront over an already-open storage handle.
    pub fn with_storage(config: AppConfig, storage: Storage) -> Result<Self, StoreError> {
        let bus = Arc::new(EventBus::new());
        let notifier = Notifier::new();
        notifier.attach(&bus);

        let ledger = CartLedger::open(Catalog::seeded(), storage.carts(), bus)?;

        let orders = storage.orders();
        orders.recover()?;
        let simulator = OrderSimulator::new(
            ledger.clone(),
            orders,
            config.order_delay(),
            config.shipping_fee(),
        );

        Ok(Storefront {
            config,
            storage: StorageState::new(storage),
            ledger,
            simulator,
            notifier,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=fiftyone=trace` - Show trace for fiftyone crates only
/// - Default: `info,fiftyone=debug`
///
/// Logs go to stderr; stdout carries only rendered views.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,fiftyone=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
