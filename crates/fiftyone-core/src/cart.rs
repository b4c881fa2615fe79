//! # Cart Bookkeeping
//!
//! The cart lines and the stock bookkeeping that keeps them consistent with
//! the catalog.
//!
//! ## Stock Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every product P, after every operation in this module:            │
//! │                                                                         │
//! │     stock(P) + Σ quantity(lines referencing P) == initial_stock(P)      │
//! │                                                                         │
//! │  add(P, 3, M)       stock 10 → 7     lines [{P,3,M}]                    │
//! │  add(P, 2, M)       stock  7 → 5     lines [{P,5,M}]   (merged)         │
//! │  remove(P, M, c)    stock  5 → 10    lines []                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is taken at add-to-cart time, not at order confirmation. An
//! abandoned cart keeps its units reserved until the lines are removed or
//! the cart is cleared. Checkout clears the cart too, so the invariant holds
//! across orders.
//!
//! Every failing operation leaves both the cart and the catalog untouched.

use chrono::Utc;

use crate::catalog::{legacy_color, Catalog};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartKey, CartLine, ProductId};

/// A persisted line that could not be re-applied to the catalog.
#[derive(Debug)]
pub struct RejectedLine {
    pub line: CartLine,
    pub reason: CoreError,
}

/// The shopping cart: an ordered list of lines, unique by [`CartKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn find(&self, key: &CartKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(key))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of price × quantity. Lines whose product no longer resolves are
    /// skipped.
    pub fn total(&self, catalog: &Catalog) -> Money {
        self.lines
            .iter()
            .filter_map(|l| {
                catalog
                    .by_id(l.product_id)
                    .map(|p| p.price().multiply_quantity(l.quantity))
            })
            .sum()
    }

    /// Builds the line key for a selection, checking size and color against
    /// the product. A missing (or blank) color becomes the product's first
    /// color, so the default is applied before any key comparison.
    pub fn resolve_key(
        catalog: &Catalog,
        product_id: ProductId,
        size: &str,
        color: Option<&str>,
    ) -> CoreResult<CartKey> {
        let product = catalog.require(product_id)?;

        if !product.has_size(size) {
            return Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: product.sizes.clone(),
            }
            .into());
        }

        let color = match color.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) if product.has_color(c) => c,
            Some(_) => {
                return Err(ValidationError::NotAllowed {
                    field: "color".to_string(),
                    allowed: product.colors.clone(),
                }
                .into())
            }
            None => product.default_color().ok_or_else(|| ValidationError::Required {
                field: "color".to_string(),
            })?,
        };

        Ok(CartKey::new(product_id, size, color))
    }

    /// Adds `quantity` units of a selection, merging into an existing line
    /// with the same key. Fails with `InsufficientStock` when the product has
    /// fewer than `quantity` units left.
    pub fn add(
        &mut self,
        catalog: &mut Catalog,
        product_id: ProductId,
        quantity: u32,
        size: &str,
        color: Option<&str>,
    ) -> CoreResult<CartKey> {
        ensure_positive(quantity)?;
        let key = Cart::resolve_key(catalog, product_id, size, color)?;

        catalog.reserve(product_id, quantity)?;

        match self.lines.iter_mut().find(|l| l.matches(&key)) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id,
                quantity,
                size: key.size.clone(),
                color: key.color.clone(),
                added_at: Utc::now(),
            }),
        }

        Ok(key)
    }

    /// Removes a line and returns its units to stock. A missing line is a
    /// no-op that returns `false`.
    pub fn remove(&mut self, catalog: &mut Catalog, key: &CartKey) -> bool {
        let Some(index) = self.lines.iter().position(|l| l.matches(key)) else {
            return false;
        };

        let line = self.lines.remove(index);
        catalog.release(line.product_id, line.quantity);
        true
    }

    /// Sets a line's quantity, moving only the difference in or out of stock.
    ///
    /// `new_quantity` must be positive; callers route zero to [`Cart::remove`].
    pub fn set_quantity(
        &mut self,
        catalog: &mut Catalog,
        key: &CartKey,
        new_quantity: u32,
    ) -> CoreResult<()> {
        ensure_positive(new_quantity)?;

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.matches(key))
            .ok_or_else(|| CoreError::CartLineNotFound {
                product_id: key.product_id,
                size: key.size.clone(),
                color: key.color.clone(),
            })?;

        catalog.require(line.product_id)?;

        if new_quantity > line.quantity {
            catalog.reserve(line.product_id, new_quantity - line.quantity)?;
        } else if new_quantity < line.quantity {
            catalog.release(line.product_id, line.quantity - new_quantity);
        }

        line.quantity = new_quantity;
        Ok(())
    }

    /// Returns every line's units to stock and empties the cart.
    pub fn clear(&mut self, catalog: &mut Catalog) {
        for line in self.lines.drain(..) {
            catalog.release(line.product_id, line.quantity);
        }
    }

    /// Rebuilds a cart from persisted lines against a freshly loaded catalog.
    ///
    /// Each line reserves its units again. Old Spanish color names are mapped
    /// to their catalog names first. Lines that do not resolve, have an
    /// invalid size or color, or need more than what is left, are rejected
    /// and returned so the caller can report them. Duplicate keys merge.
    pub fn restore(catalog: &mut Catalog, lines: Vec<CartLine>) -> (Cart, Vec<RejectedLine>) {
        let mut cart = Cart::new();
        let mut rejected = Vec::new();

        for line in lines {
            match cart.apply_line(catalog, &line) {
                Ok(()) => {}
                Err(reason) => rejected.push(RejectedLine { line, reason }),
            }
        }

        (cart, rejected)
    }

    /// Replaces the whole cart with `lines` (cart import).
    ///
    /// The current reservations are released and the new ones taken in one
    /// step; if any line fails, the cart and the catalog are left exactly as
    /// they were.
    pub fn replace(&mut self, catalog: &mut Catalog, lines: Vec<CartLine>) -> CoreResult<()> {
        let mut staged_catalog = catalog.clone();
        let mut staged = self.clone();
        staged.clear(&mut staged_catalog);

        for line in &lines {
            staged.apply_line(&mut staged_catalog, line)?;
        }

        *catalog = staged_catalog;
        *self = staged;
        Ok(())
    }

    /// Reserves one persisted or imported line, keeping its timestamp.
    fn apply_line(&mut self, catalog: &mut Catalog, line: &CartLine) -> CoreResult<()> {
        ensure_positive(line.quantity)?;
        let color = legacy_color(&line.color).unwrap_or(line.color.as_str());
        let key = Cart::resolve_key(catalog, line.product_id, &line.size, Some(color))?;

        catalog.reserve(line.product_id, line.quantity)?;

        match self.lines.iter_mut().find(|l| l.matches(&key)) {
            Some(existing) => existing.quantity += line.quantity,
            None => self.lines.push(CartLine {
                color: key.color,
                ..line.clone()
            }),
        }
        Ok(())
    }
}

fn ensure_positive(quantity: u32) -> CoreResult<()> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
