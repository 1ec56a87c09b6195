//! # Cart
//!
//! Lines the customer intends to buy, with a running subtotal.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation          Existing line            No line                    │
//! │  ────────────────   ──────────────────────   ─────────────────────────  │
//! │  add(item)          quantity += 1            push line, quantity 1      │
//! │  set_quantity(0)    remove line              LineNotFound               │
//! │  set_quantity(n)    quantity = n             LineNotFound               │
//! │  remove(id)         remove line              LineNotFound               │
//! │  clear()            drop everything          no-op                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The subtotal here is at base (catalog) prices and is updated on every
//! mutation. [`Cart::recompute_subtotal`] sums the lines from scratch and must
//! always agree with [`Cart::subtotal`]. Reseller pricing is applied later by
//! [`crate::pricing`].

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, Item};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    subtotal: Money,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `item`.
    ///
    /// ## Returns
    /// The line's new quantity.
    ///
    /// ## Errors
    /// - `CartTooLarge` when a new line would exceed [`MAX_CART_ITEMS`]
    /// - `QuantityTooLarge` when the line is already at [`MAX_ITEM_QUANTITY`]
    pub fn add(&mut self, item: &Item) -> CoreResult<u32> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            let requested = line.quantity + 1;
            if requested > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = requested;
            self.subtotal += line.unit_price();
            return Ok(requested);
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let line = CartLine::from_item(item);
        self.subtotal += line.unit_price();
        self.lines.push(line);
        Ok(1)
    }

    /// Sets a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, item_id: &str, quantity: u32) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if quantity == 0 {
            return self.remove(item_id).map(|_| ());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == item_id)
            .ok_or_else(|| CoreError::LineNotFound(item_id.to_string()))?;

        self.subtotal -= line.line_total();
        line.quantity = quantity;
        self.subtotal += line.line_total();
        Ok(())
    }

    /// Removes a line, returning it.
    pub fn remove(&mut self, item_id: &str) -> CoreResult<CartLine> {
        let position = self
            .lines
            .iter()
            .position(|l| l.item_id == item_id)
            .ok_or_else(|| CoreError::LineNotFound(item_id.to_string()))?;

        let line = self.lines.remove(position);
        self.subtotal -= line.line_total();
        Ok(line)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.subtotal = Money::zero();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities (the badge number in the header).
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Running subtotal at base prices.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Subtotal summed from the lines.
    pub fn recompute_subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
