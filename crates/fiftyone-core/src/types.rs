//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u32)       │◄──│  product_id     │   │  id (UUID)      │       │
//! │  │  name, price    │   │  size, color    │──►│  items          │       │
//! │  │  sizes, colors  │   │  quantity       │   │  subtotal       │       │
//! │  │  stock          │   │  added_at       │   │  shipping/total │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    CartKey      │   │  CustomerInfo   │       │
//! │  │  t-shirts, ...  │   │ (id,size,color) │   │  contact +      │       │
//! │  └─────────────────┘   └─────────────────┘   │  shipping       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Field Names
//! `CartLine` and `Order` serialize with the field names already present in
//! browser storage (`id`, `addedAt`, `customerInfo`, ...), so old data loads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Stable product identifier.
pub type ProductId = u32;

// =============================================================================
// Category
// =============================================================================

/// The fixed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TShirts,
    Hoodies,
    Pants,
    Jackets,
    Shorts,
    Polos,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 6] = [
        Category::TShirts,
        Category::Hoodies,
        Category::Pants,
        Category::Jackets,
        Category::Shorts,
        Category::Polos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TShirts => "t-shirts",
            Category::Hoodies => "hoodies",
            Category::Pants => "pants",
            Category::Jackets => "jackets",
            Category::Shorts => "shorts",
            Category::Polos => "polos",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A purchasable product.
///
/// `stock` is the only mutable field and only the cart bookkeeping in
/// [`crate::cart`] touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in cents, never negative.
    pub price_cents: i64,
    /// Emoji shown on the product card.
    pub image: String,
    pub category: Category,
    /// Available sizes, non-empty, in display order.
    pub sizes: Vec<String>,
    /// Available colors, non-empty, in display order.
    pub colors: Vec<String>,
    /// Units currently available (not reserved by any cart line).
    pub stock: u32,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// The color used when a shopper does not pick one.
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// Identity of a cart line. Adding with an existing key merges quantities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl CartKey {
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        CartKey {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }
}

/// One (product, size, color) selection with a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Always > 0.
    pub quantity: u32,
    pub size: String,
    pub color: String,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    pub fn key(&self) -> CartKey {
        CartKey::new(self.product_id, self.size.clone(), self.color.clone())
    }

    pub fn matches(&self, key: &CartKey) -> bool {
        self.product_id == key.product_id && self.size == key.size && self.color == key.color
    }
}

// =============================================================================
// Customer Info
// =============================================================================

/// Contact and shipping details entered on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Order
// =============================================================================

/// Order status. Orders are confirmed on creation and never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "confirmado")]
    Confirmed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Confirmed => f.write_str("confirmed"),
        }
    }
}

/// An immutable order record.
///
/// Reading also accepts orders written with a millisecond timestamp id and
/// float dollar amounts, converting them to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Cart lines as they were when the order was committed.
    pub items: Vec<CartLine>,
    pub subtotal: Money,
    pub shipping: Money,
    /// Always `subtotal + shipping`.
    pub total: Money,
    pub customer_info: CustomerInfo,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

/// Order as it may appear in storage.
///
/// ```text
/// current:  { "id": "9f0c…-uuid", "subtotal": 3598, ... }    cents
/// legacy:   { "id": 1700000000000, "subtotal": 35.98, ... } dollars
/// ```
/// A numeric id marks the legacy shape; its amounts are converted to cents.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    id: StoredOrderId,
    items: Vec<CartLine>,
    subtotal: serde_json::Number,
    shipping: serde_json::Number,
    total: serde_json::Number,
    customer_info: CustomerInfo,
    #[serde(default)]
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOrderId {
    Text(String),
    Millis(u64),
}

impl StoredOrder {
    fn into_order<E: de::Error>(self) -> Result<Order, E> {
        let legacy = matches!(self.id, StoredOrderId::Millis(_));
        let amount = |field: &str, n: &serde_json::Number| -> Result<Money, E> {
            let money = if legacy {
                n.as_f64().and_then(Money::from_major_units)
            } else {
                n.as_i64().map(Money::from_cents)
            };
            money.ok_or_else(|| E::custom(format!("invalid {field} amount: {n}")))
        };

        Ok(Order {
            subtotal: amount("subtotal", &self.subtotal)?,
            shipping: amount("shipping", &self.shipping)?,
            total: amount("total", &self.total)?,
            id: match self.id {
                StoredOrderId::Text(id) => id,
                StoredOrderId::Millis(ms) => ms.to_string(),
            },
            items: self.items,
            customer_info: self.customer_info,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StoredOrder::deserialize(deserializer)?.into_order()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
