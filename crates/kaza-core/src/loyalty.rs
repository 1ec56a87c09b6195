//! # Loyalty Points
//!
//! Points only ever go up. Two accrual rules:
//!
//! | Event             | Points                          |
//! |-------------------|---------------------------------|
//! | Item added        | ⌊base unit price / R$ 10,00⌋    |
//! | Purchase complete | ⌊order total / R$ 5,00⌋         |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// One point per this much item price.
pub const ITEM_POINT_UNIT: Money = Money::from_cents(1000);

/// One bonus point per this much order total.
pub const ORDER_BONUS_UNIT: Money = Money::from_cents(500);

/// Accumulated loyalty balance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct LoyaltyPoints(u64);

impl LoyaltyPoints {
    pub const fn new(points: u64) -> Self {
        LoyaltyPoints(points)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Adds points, saturating instead of wrapping.
    pub fn award(&mut self, points: u64) -> u64 {
        self.0 = self.0.saturating_add(points);
        self.0
    }
}

/// Points for adding one unit priced `price` to the cart.
///
/// ## Example
/// ```rust
/// use kaza_core::loyalty::points_for_item;
/// use kaza_core::Money;
///
/// assert_eq!(points_for_item(Money::from_cents(29900)), 29);
/// ```
pub fn points_for_item(price: Money) -> u64 {
    price.whole_units_of(ITEM_POINT_UNIT)
}

/// Bonus points for a completed purchase.
pub fn bonus_for_order(total: Money) -> u64 {
    total.whole_units_of(ORDER_BONUS_UNIT)
}
