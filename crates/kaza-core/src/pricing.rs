//! # Pricing
//!
//! Turns a cart into the numbers shown in the cart drawer and charged at
//! checkout.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Unit price      base, or base − 20% (rounded) for resellers         │
//! │  2. Subtotal        Σ unit price × quantity                             │
//! │  3. Discount        active coupon applied to the subtotal               │
//! │  4. Shipping        0 if subtotal > R$ 200,00, else R$ 15,00            │
//! │  5. Total           max(0, subtotal − discount + shipping)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reseller pricing is applied per unit before summing, so a reseller's
//! subtotal always equals the sum of the prices they were shown. Catalog
//! prices are never mutated.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;
use crate::types::{CartLine, Coupon, SubscriptionStatus};

// =============================================================================
// Pricing Policy
// =============================================================================

/// Store-wide pricing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Money,

    /// Flat shipping fee otherwise.
    pub shipping_fee: Money,

    /// Reseller discount on every unit price, in basis points (2000 = 20%).
    pub reseller_discount_bps: u32,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            free_shipping_threshold: Money::from_cents(20000),
            shipping_fee: Money::from_cents(1500),
            reseller_discount_bps: 2000,
        }
    }
}

impl PricingPolicy {
    /// Price of one unit under the given subscription status.
    ///
    /// ## Example
    /// ```rust
    /// use kaza_core::{Money, PricingPolicy, SubscriptionStatus};
    ///
    /// let policy = PricingPolicy::default();
    /// let base = Money::from_cents(29900);
    /// assert_eq!(policy.unit_price(base, SubscriptionStatus::Free), base);
    /// assert_eq!(policy.unit_price(base, SubscriptionStatus::Reseller).cents(), 23920);
    /// ```
    pub fn unit_price(&self, base: Money, status: SubscriptionStatus) -> Money {
        if status.is_reseller() {
            base.apply_percentage_discount(self.reseller_discount_bps)
        } else {
            base
        }
    }

    /// Shipping for a subtotal. The threshold itself still pays shipping.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            self.shipping_fee
        }
    }

    /// Prices every cart line.
    pub fn price_lines(&self, cart: &Cart, status: SubscriptionStatus) -> Vec<PricedLine> {
        cart.lines()
            .iter()
            .map(|line| PricedLine::new(line, self.unit_price(line.unit_price(), status)))
            .collect()
    }

    /// Subtotal under the given subscription status.
    pub fn subtotal(&self, cart: &Cart, status: SubscriptionStatus) -> Money {
        if !status.is_reseller() {
            return cart.subtotal();
        }
        cart.lines()
            .iter()
            .map(|line| {
                self.unit_price(line.unit_price(), status)
                    .multiply_quantity(line.quantity)
            })
            .sum()
    }

    /// Computes every figure of the cart summary.
    pub fn compute_totals(
        &self,
        cart: &Cart,
        coupon: Option<&Coupon>,
        status: SubscriptionStatus,
    ) -> CartTotals {
        let subtotal = self.subtotal(cart, status);
        let discount = coupon.map_or(Money::zero(), |c| c.discount_for(subtotal));
        let shipping = self.shipping_for(subtotal);
        let total = (subtotal - discount + shipping).floor_zero();

        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            discount,
            shipping,
            total,
            reseller_savings: cart.subtotal() - subtotal,
            coupon_code: coupon.map(|c| c.code.clone()),
        }
    }
}

// =============================================================================
// Priced Line
// =============================================================================

/// A cart line with the unit price actually charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
}

impl PricedLine {
    fn new(line: &CartLine, unit_price: Money) -> Self {
        PricedLine {
            item_id: line.item_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price,
            line_total: unit_price.multiply_quantity(line.quantity),
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary returned to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct lines.
    pub item_count: usize,
    /// Sum of quantities.
    pub total_quantity: u32,
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
    /// How much reseller pricing took off the base subtotal.
    pub reseller_savings: Money,
    /// Active coupon, if any.
    pub coupon_code: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::coupon::CouponBook;

    fn cart_with(ids: &[&str]) -> Cart {
        let catalog = Catalog::sample();
        let mut cart = Cart::new();
        for id in ids {
            cart.add(catalog.get(id).unwrap()).unwrap();
        }
        cart
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(Money::from_cents(20000)).cents(), 1500);
        assert_eq!(policy.shipping_for(Money::from_cents(20001)), Money::zero());
        assert_eq!(policy.shipping_for(Money::zero()).cents(), 1500);
    }

    #[test]
    fn test_reseller_prices_each_unit() {
        let policy = PricingPolicy::default();
        // two Toalha de Mesa (R$ 189,00) → 151,20 each
        let cart = cart_with(&["2", "2"]);

        let free = policy.compute_totals(&cart, None, SubscriptionStatus::Free);
        assert_eq!(free.subtotal.cents(), 37800);
        assert!(free.reseller_savings.is_zero());

        let reseller = policy.compute_totals(&cart, None, SubscriptionStatus::Reseller);
        assert_eq!(reseller.subtotal.cents(), 30240);
        assert_eq!(reseller.reseller_savings.cents(), 7560);
        assert!(reseller.shipping.is_zero());
    }

    #[test]
    fn test_reseller_rounding_per_unit() {
        let policy = PricingPolicy::default();
        // 0.8 × 0,03 = 0,024 → 0,02 per unit, not 0,8 × 0,09 on the sum
        assert_eq!(
            policy
                .unit_price(Money::from_cents(3), SubscriptionStatus::Reseller)
                .cents(),
            2
        );
    }

    #[test]
    fn test_reseller_can_lose_free_shipping() {
        let policy = PricingPolicy::default();
        // Cortina R$ 219,00 → reseller 175,20, below the threshold
        let cart = cart_with(&["6"]);
        let totals = policy.compute_totals(&cart, None, SubscriptionStatus::Reseller);
        assert_eq!(totals.subtotal.cents(), 17520);
        assert_eq!(totals.shipping.cents(), 1500);
        assert_eq!(totals.total.cents(), 19020);
    }

    #[test]
    fn test_percentage_coupon_totals() {
        let policy = PricingPolicy::default();
        let book = CouponBook::default_coupons();
        let cart = cart_with(&["1"]);

        let totals =
            policy.compute_totals(&cart, book.get("BEMVINDO15"), SubscriptionStatus::Free);
        assert_eq!(totals.discount.cents(), 4485);
        assert_eq!(totals.total.cents(), 29900 - 4485);
        assert_eq!(totals.coupon_code.as_deref(), Some("BEMVINDO15"));
    }

    #[test]
    fn test_price_lines() {
        let policy = PricingPolicy::default();
        let cart = cart_with(&["1", "8", "8"]);
        let lines = policy.price_lines(&cart, SubscriptionStatus::Reseller);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].unit_price.cents(), 23920);
        assert_eq!(lines[1].quantity, 2);
        assert_eq!(lines[1].line_total.cents(), 7120 * 2);

        let sum: Money = lines.iter().map(|l| l.line_total).sum();
        assert_eq!(sum, policy.subtotal(&cart, SubscriptionStatus::Reseller));
    }

    #[test]
    fn test_empty_cart_totals() {
        let totals =
            PricingPolicy::default().compute_totals(&Cart::new(), None, SubscriptionStatus::Free);
        assert_eq!(totals.item_count, 0);
        assert!(totals.subtotal.is_zero());
        assert!(totals.discount.is_zero());
        assert_eq!(totals.total.cents(), 1500);
    }
}
