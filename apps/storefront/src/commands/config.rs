//! # Config Commands
//!
//! Read-only view of the storefront configuration.

use serde::Serialize;
use tracing::debug;

use fiftyone_core::Money;

use crate::state::AppConfig;

/// What the presentation layer needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub store_name: String,
    pub shipping_fee: Money,
    pub order_delay_ms: u64,
    pub currency_symbol: String,
    pub currency_decimals: u8,
}

/// Gets the current storefront configuration.
///
/// ## When Used
/// - Session start (header, currency formatting)
/// - Checkout panel (shipping line)
pub fn get_config(config: &AppConfig) -> ConfigResponse {
    debug!("get_config command");
    ConfigResponse {
        store_name: config.store_name.clone(),
        shipping_fee: config.shipping_fee(),
        order_delay_ms: config.order_delay_ms,
        currency_symbol: config.currency_symbol.clone(),
        currency_decimals: config.currency_decimals,
    }
}
