//! # Configuration State
//!
//! Storefront configuration loaded at startup.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (this file)                                               │
//! │  2. Config file: $FIFTYONE_CONFIG, or                                  │
//! │       ~/.config/fiftyone-storefront/storefront.toml (Linux)            │
//! │  3. Environment variables                                              │
//! │       FIFTYONE_DATA_DIR         data directory for cart/orders         │
//! │       FIFTYONE_STORE_NAME       name shown in the header               │
//! │       FIFTYONE_ORDER_DELAY_MS   simulated processing delay             │
//! │       FIFTYONE_SHIPPING_CENTS   flat shipping fee                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! store_name = "FiftyOne Downtown"
//! data_dir = "/var/lib/fiftyone"
//! order_delay_ms = 500
//! shipping_cents = 0
//! ```
//!
//! Configuration is read-only after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use fiftyone_core::{Money, ORDER_DELAY_MS, SHIPPING_FEE_CENTS};
use fiftyone_store::StoreConfig;

/// Configuration loading errors. These are the only fatal errors: the
/// storefront refuses to start with a broken config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store name shown in the header.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    /// Directory holding `cart.json` and `orders.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Simulated order processing delay in milliseconds.
    #[serde(default = "default_order_delay_ms")]
    pub order_delay_ms: u64,

    /// Flat shipping fee in cents.
    #[serde(default = "default_shipping_cents")]
    pub shipping_cents: i64,

    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// Pretty-print the stored JSON documents.
    #[serde(default)]
    pub pretty_storage: bool,
}

fn default_store_name() -> String {
    "FiftyOne".to_string()
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "fiftyone", "storefront")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".fiftyone"))
}

fn default_order_delay_ms() -> u64 {
    ORDER_DELAY_MS
}

fn default_shipping_cents() -> i64 {
    SHIPPING_FEE_CENTS
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Store: "FiftyOne"
    /// - Data: platform data directory
    /// - Order delay: 2000 ms
    /// - Shipping: $5.99
    /// - Currency: `$`, 2 decimals
    fn default() -> Self {
        AppConfig {
            store_name: default_store_name(),
            data_dir: default_data_dir(),
            order_delay_ms: default_order_delay_ms(),
            shipping_cents: default_shipping_cents(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            pretty_storage: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.or_else(|| std::env::var("FIFTYONE_CONFIG").ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => AppConfig::from_file(&path)?,
            None => match AppConfig::default_config_path().filter(|p| p.exists()) {
                Some(path) => AppConfig::from_file(&path)?,
                None => {
                    debug!("No config file, using defaults");
                    AppConfig::default()
                }
            },
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        info!(
            store = %config.store_name,
            data_dir = %config.data_dir.display(),
            order_delay_ms = config.order_delay_ms,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reads a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `storefront.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fiftyone", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Applies `FIFTYONE_*` overrides read through `lookup`. Unparseable
    /// numbers are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("FIFTYONE_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(name) = lookup("FIFTYONE_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(delay) = lookup("FIFTYONE_ORDER_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.order_delay_ms = delay;
        }

        if let Some(cents) = lookup("FIFTYONE_SHIPPING_CENTS").and_then(|v| v.parse().ok()) {
            self.shipping_cents = cents;
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(ConfigError::Invalid("store_name must not be empty".into()));
        }

        if self.shipping_cents < 0 {
            return Err(ConfigError::Invalid(
                "shipping_cents must not be negative".into(),
            ));
        }

        if self.currency_decimals > 4 {
            return Err(ConfigError::Invalid(
                "currency_decimals must be at most 4".into(),
            ));
        }

        Ok(())
    }

    pub fn order_delay(&self) -> Duration {
        Duration::from_millis(self.order_delay_ms)
    }

    pub fn shipping_fee(&self) -> Money {
        Money::from_cents(self.shipping_cents)
    }

    /// Storage settings for the configured data directory.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir).pretty(self.pretty_storage)
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use fiftyone_core::Money;
    /// use fiftyone_storefront::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        let divisor = 10_i64.pow(u32::from(self.currency_decimals));
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}
